//! Protocol types shared by the codec, the connection layer and handlers.

mod error;
mod request;
mod response;

pub use error::{HttpError, ParseError, SendError};
pub use request::Request;
pub use response::Response;
