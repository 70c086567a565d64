pub mod connection;
pub mod endpoints;

pub use connection::ImageGenerator;
pub use endpoints::ImageProvider;
