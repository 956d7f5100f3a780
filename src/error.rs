// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Pushing a frame to the window failed
    Settings(String),     // Reading/parsing/writing the settings file failed
    SingularTransform,    // The view transform can no longer be inverted
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::Settings(s) => write!(f, "Settings error: {s}"),
            Error::SingularTransform => write!(f, "View transform is singular; screen points cannot be mapped to the canvas"),
        }
    }
}

impl std::error::Error for Error {}
