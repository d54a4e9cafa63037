use log::Level;

/// Logs to stderr, `info` and up unless `RUST_LOG` says otherwise.
pub fn init() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    .format_timestamp_secs()
    .init();
}

/// Logs a failure together with the caller's location and turns it into an [`anyhow::Error`].
pub trait LogExt<T> {
  fn log_at(self, level: Level, msg: &str) -> anyhow::Result<T>;

  #[track_caller]
  fn log_warn(self, msg: &str) -> anyhow::Result<T>
  where
    Self: Sized,
  {
    self.log_at(Level::Warn, msg)
  }

  #[track_caller]
  fn log_error(self, msg: &str) -> anyhow::Result<T>
  where
    Self: Sized,
  {
    self.log_at(Level::Error, msg)
  }
}

impl<T> LogExt<T> for Option<T> {
  #[track_caller]
  fn log_at(self, level: Level, msg: &str) -> anyhow::Result<T> {
    match self {
      Some(value) => Ok(value),
      None => {
        let location = std::panic::Location::caller();
        log::log!(level, "[{location}] {msg}");
        anyhow::bail!(msg.to_owned())
      }
    }
  }
}

impl<T, E> LogExt<T> for Result<T, E> where E: std::fmt::Display {
  #[track_caller]
  fn log_at(self, level: Level, msg: &str) -> anyhow::Result<T> {
    match self {
      Ok(value) => Ok(value),
      Err(error) => {
        let location = std::panic::Location::caller();
        log::log!(level, "[{location}] {msg}: {error}");
        anyhow::bail!("{msg}: {error}")
      }
    }
  }
}
