use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone)]
pub enum Error {
    /// Timeout, refused connection, non-200 status or unreadable body.
    ConnectionError(String),
    /// Inverter answered but reported a failure in its own status block.
    ApiError(String),
    InvalidResponse(String, String),
    UnsupportedInverter(String),
    ConfigError(String),
    FormatError,
    InternalError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConnectionError(s) => write!(
                f,
                "error performing check or connecting to inverter: {}",
                s
            ),
            Error::ApiError(s) => write!(f, "inverter API error: {}", s),
            Error::InvalidResponse(body, e) => {
                write!(f, "invalid inverter response ({}): {}", e, body)
            }
            Error::UnsupportedInverter(s) => write!(f, "unsupported inverter type: {}", s),
            Error::ConfigError(s) => write!(f, "configuration error: {}", s),
            Error::FormatError => write!(f, "unable to format response"),
            Error::InternalError => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for Error {}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = match self {
            Error::ConnectionError(_) | Error::ApiError(_) | Error::InvalidResponse(_, _) => {
                Status::BadGateway
            }
            _ => Status::InternalServerError,
        };
        let error = format!(
            "<html><body><h3>{}</h3><code>{}</code></body></html>",
            status, self
        );

        Response::build()
            .status(status)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
