//! Merge command-line flags, config files and environment variables into one
//! annotated struct.
//!
//! Kiper turns a config struct into a set of long flags, parses the command
//! line, reads any config files it was pointed at, and fills every field from
//! the highest-priority source that has a value for it.
//!
//! ```ignore
//! let mut config = AppConfig::default();
//! Kiper::new("myapp", "does useful things")
//!     .config_file_flag("config", "path to the config file", "./myapp.json")
//!     .env_prefix("MYAPP")
//!     .parse(&mut config, std::env::args_os().skip(1))?;
//! ```
//!
//! # Describing a config
//!
//! A config struct implements [`KiperConfig`] by walking its fields and
//! handing each one to a [`Visitor`] together with a tag:
//!
//! ```ignore
//! impl KiperConfig for AppConfig {
//!     fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
//!         v.value("name:address;help:address of server;default:127.0.0.1",
//!                 Slot::custom(&mut self.address))?;
//!         v.value("name:verbose;default:false", Slot::from(&mut self.verbose))?;
//!         v.group("name:server", &mut self.server)
//!     }
//! }
//! ```
//!
//! Tags are `;`-separated `key:value` pairs. Value fields accept `name`,
//! `default`, `help` and `required`; groups accept only `name`. The order of
//! calls is the order flags appear in help output.
//!
//! Supported field types are `String`, `bool`, the signed and unsigned
//! integers up to 64 bits, `Vec` and `Option` of `String`/`i64`/`bool`, and
//! any type implementing [`KiperValue`] via [`Slot::custom`]. Integers travel
//! through `i64`, so `u64`/`usize` fields top out at `i64::MAX`. `Option` and
//! `Box` wrappers of groups are allocated on first visit.
//!
//! # Flags
//!
//! Each value field becomes a long flag named by its dotted path:
//! `server.timeout` for `timeout` inside the `server` group. Booleans accept
//! a bare `--flag` or `--flag=false`. A `required` field must be given on the
//! command line; its default is ignored.
//!
//! # Precedence
//!
//! ```text
//! environment    [PREFIX_]GROUP_NAME
//!      ↑ overrides
//! config files   later files override earlier ones
//!      ↑ overrides
//! flags          explicit value or declared default
//! ```
//!
//! Precedence is decided per field. A file that sets one key leaves every
//! other field to the flags, and a field no source mentions keeps whatever
//! the caller put there. Note that config files beat explicit flags: the
//! file is the deployment's record and flags fill in what it leaves out.
//!
//! # Config files
//!
//! Files are decoded by extension: `.json`, `.yaml`/`.yml` and `.toml`.
//! Candidates come from [`search_paths()`](Kiper::search_paths) first, then
//! [`config_file_path()`](Kiper::config_file_path) entries, then the value
//! of the [config-file flag](Kiper::config_file_flag). Missing files are
//! skipped silently.
//!
//! # Environment variables
//!
//! With prefix `MYAPP`, `server.timeout` is read from `MYAPP_SERVER_TIMEOUT`.
//! Names are uppercased and `-`/`.` become `_`. Empty variables count as
//! unset. Sequences given as one string are split on the delimiter regex
//! (default `\s*,\s*`).
//!
//! # Error handling
//!
//! All fallible operations return [`KiperError`]. Merging stops at the first
//! failing field; fields merged before it keep their new values.

pub mod error;
pub mod types;

mod builder;
mod coerce;
mod config;
mod custom;
mod declare;
mod env;
mod file;
pub(crate) mod merge;
mod ops;
mod resolve;
mod slot;
mod tag;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::Kiper;
pub use coerce::DEFAULT_DELIMITER;
pub use config::{KiperConfig, Visitor};
pub use custom::{KiperValue, ValueError};
pub use error::KiperError;
pub use ops::{NOT_SET, get_value, list_values};
pub use slot::{ElemKind, IntSlot, IntWidth, Kind, OptSlot, SeqSlot, Slot};
pub use types::SearchPath;
pub use value::{Map, Value, map_get};
