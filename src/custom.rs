//! Custom value protocol.
//!
//! A field type that is neither a primitive nor a sequence can still be bound
//! to a flag by implementing [`KiperValue`]. The merge hands it the winning
//! source as text; flag declaration uses [`KiperValue::render`] to show the
//! current value as the default.

/// Error returned by [`KiperValue::set`].
pub type ValueError = Box<dyn std::error::Error + Send + Sync>;

/// A field that parses and renders its own textual form.
///
/// ```ignore
/// #[derive(Default)]
/// struct Port(String);
///
/// impl KiperValue for Port {
///     fn set(&mut self, text: &str) -> Result<(), ValueError> {
///         text.parse::<u16>().map_err(|_| "not a valid port value")?;
///         self.0 = text.to_string();
///         Ok(())
///     }
///
///     fn render(&self) -> String {
///         self.0.clone()
///     }
/// }
/// ```
pub trait KiperValue {
    /// Parse `text` and store it, or reject it.
    fn set(&mut self, text: &str) -> Result<(), ValueError>;

    /// Render the current value as text.
    fn render(&self) -> String;
}

/// An unset optional custom value is built from `T::default()` on its first
/// successful assignment and renders as empty text. Rejected text leaves it
/// unset.
impl<T: KiperValue + Default> KiperValue for Option<T> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        match self {
            Some(value) => value.set(text),
            None => {
                let mut value = T::default();
                value.set(text)?;
                *self = Some(value);
                Ok(())
            }
        }
    }

    fn render(&self) -> String {
        self.as_ref().map(T::render).unwrap_or_default()
    }
}

impl<T: KiperValue + ?Sized> KiperValue for Box<T> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        (**self).set(text)
    }

    fn render(&self) -> String {
        (**self).render()
    }
}
