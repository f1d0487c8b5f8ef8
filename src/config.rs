//! How a configuration struct describes itself.
//!
//! A config type implements [`KiperConfig`] by reporting each field, in
//! declaration order, to a [`Visitor`]: leaf fields through
//! [`Visitor::value`] with a value tag and a [`Slot`], nested groups through
//! [`Visitor::group`] with a group tag. The same `visit` drives flag
//! declaration, merging, and listing, so the three walks cannot drift apart.
//!
//! Fields that are not reported are ignored entirely.
//!
//! ```ignore
//! struct Config {
//!     address: Address,
//!     id: i64,
//!     server: Server,
//! }
//!
//! impl KiperConfig for Config {
//!     fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
//!         v.value("name:address;default:127.0.0.1", Slot::custom(&mut self.address))?;
//!         v.value("name:id;default:1", (&mut self.id).into())?;
//!         v.group("name:server", &mut self.server)
//!     }
//! }
//! ```

use crate::error::KiperError;
use crate::slot::Slot;

/// A struct whose fields can be populated from flags, files and env.
pub trait KiperConfig {
    fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError>;
}

/// Receives the fields of a [`KiperConfig`].
pub trait Visitor {
    /// A leaf field bound to one flag. `tag` is `name:..;default:..;help:..;required`.
    fn value(&mut self, tag: &str, slot: Slot<'_>) -> Result<(), KiperError>;

    /// A nested group. `tag` is `name:..`.
    fn group(&mut self, tag: &str, group: &mut dyn KiperConfig) -> Result<(), KiperError>;
}

/// An absent optional group is allocated with `T::default()` when visited.
impl<T: KiperConfig + Default> KiperConfig for Option<T> {
    fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
        self.get_or_insert_with(T::default).visit(v)
    }
}

impl<T: KiperConfig + ?Sized> KiperConfig for Box<T> {
    fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
        (**self).visit(v)
    }
}
