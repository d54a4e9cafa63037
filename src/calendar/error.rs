use std::fmt::{Display, Formatter};

/// Errors raised while fetching, parsing or delivering a feed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Error {
  pub kind: ErrorKind,
  pub message: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
  Http,
  Xml,
  Calendar,
  Delivery,
  Io,
}

impl Error {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?} error: {}", self.kind, self.message)
  }
}

impl std::error::Error for Error {}

impl From<ureq::Error> for Error {
  fn from(e: ureq::Error) -> Self {
    Self {
      kind: ErrorKind::Http,
      message: e.to_string(),
    }
  }
}

impl From<xmltree::ParseError> for Error {
  fn from(e: xmltree::ParseError) -> Self {
    Self {
      kind: ErrorKind::Xml,
      message: e.to_string(),
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self {
      kind: ErrorKind::Io,
      message: e.to_string(),
    }
  }
}
