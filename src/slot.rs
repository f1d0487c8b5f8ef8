//! Typed references to leaf fields.
//!
//! A [`Slot`] is what a config struct hands to a [`Visitor`](crate::Visitor)
//! for each leaf: a mutable reference tagged with the field's kind. The set
//! of kinds is closed; flag declaration and merging both `match` on it.
//!
//! Most field types convert with `.into()`:
//!
//! ```ignore
//! v.value("name:timeout;default:30", (&mut self.timeout).into())?;
//! v.value("name:address", Slot::custom(&mut self.address))?;
//! ```

use crate::custom::KiperValue;

pub enum Slot<'a> {
    Str(&'a mut String),
    Bool(&'a mut bool),
    Int(IntSlot<'a>),
    Seq(SeqSlot<'a>),
    Opt(OptSlot<'a>),
    Custom(&'a mut dyn KiperValue),
}

/// An integer field of any supported width.
///
/// Every source passes integers through `i64`, so `u64` and `usize` fields
/// accept values up to `i64::MAX` only. Larger values are rejected as
/// invalid rather than wrapped.
pub enum IntSlot<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
}

pub enum SeqSlot<'a> {
    Str(&'a mut Vec<String>),
    Int(&'a mut Vec<i64>),
    Bool(&'a mut Vec<bool>),
}

pub enum OptSlot<'a> {
    Str(&'a mut Option<String>),
    Int(&'a mut Option<i64>),
    Bool(&'a mut Option<bool>),
}

/// Integer width of an [`IntSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

/// Element type of a sequence field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemKind {
    Str,
    Int,
    Bool,
}

/// The kind of a leaf field, detached from the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Str,
    Int(IntWidth),
    Bool,
    Seq(ElemKind),
    Custom,
}

impl<'a> Slot<'a> {
    pub fn custom<T: KiperValue>(value: &'a mut T) -> Self {
        Slot::Custom(value)
    }
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Str(_) | Slot::Opt(OptSlot::Str(_)) => Kind::Str,
            Slot::Bool(_) | Slot::Opt(OptSlot::Bool(_)) => Kind::Bool,
            Slot::Int(i) => Kind::Int(i.width()),
            Slot::Opt(OptSlot::Int(_)) => Kind::Int(IntWidth::I64),
            Slot::Seq(SeqSlot::Str(_)) => Kind::Seq(ElemKind::Str),
            Slot::Seq(SeqSlot::Int(_)) => Kind::Seq(ElemKind::Int),
            Slot::Seq(SeqSlot::Bool(_)) => Kind::Seq(ElemKind::Bool),
            Slot::Custom(_) => Kind::Custom,
        }
    }

    /// The field's current value as text, `None` for an unset optional.
    pub fn render(&self) -> Option<String> {
        match self {
            Slot::Str(s) => Some((**s).clone()),
            Slot::Bool(b) => Some(b.to_string()),
            Slot::Int(i) => Some(i.get().to_string()),
            Slot::Seq(SeqSlot::Str(v)) => Some(v.join(",")),
            Slot::Seq(SeqSlot::Int(v)) => Some(join(v.iter())),
            Slot::Seq(SeqSlot::Bool(v)) => Some(join(v.iter())),
            Slot::Opt(OptSlot::Str(o)) => (**o).clone(),
            Slot::Opt(OptSlot::Int(o)) => (**o).map(|i| i.to_string()),
            Slot::Opt(OptSlot::Bool(o)) => (**o).map(|b| b.to_string()),
            Slot::Custom(c) => Some(c.render()),
        }
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

impl IntSlot<'_> {
    pub fn width(&self) -> IntWidth {
        match self {
            IntSlot::I8(_) => IntWidth::I8,
            IntSlot::I16(_) => IntWidth::I16,
            IntSlot::I32(_) => IntWidth::I32,
            IntSlot::I64(_) => IntWidth::I64,
            IntSlot::U8(_) => IntWidth::U8,
            IntSlot::U16(_) => IntWidth::U16,
            IntSlot::U32(_) => IntWidth::U32,
            IntSlot::U64(_) => IntWidth::U64,
            IntSlot::Usize(_) => IntWidth::Usize,
        }
    }

    pub fn get(&self) -> i128 {
        match self {
            IntSlot::I8(v) => i128::from(**v),
            IntSlot::I16(v) => i128::from(**v),
            IntSlot::I32(v) => i128::from(**v),
            IntSlot::I64(v) => i128::from(**v),
            IntSlot::U8(v) => i128::from(**v),
            IntSlot::U16(v) => i128::from(**v),
            IntSlot::U32(v) => i128::from(**v),
            IntSlot::U64(v) => i128::from(**v),
            IntSlot::Usize(v) => **v as i128,
        }
    }

    /// Store `n` if it fits the field's width. Returns `false` otherwise.
    pub fn store(&mut self, n: i64) -> bool {
        fn put<T: TryFrom<i64>>(target: &mut T, n: i64) -> bool {
            match T::try_from(n) {
                Ok(v) => {
                    *target = v;
                    true
                }
                Err(_) => false,
            }
        }
        match self {
            IntSlot::I8(v) => put(&mut **v, n),
            IntSlot::I16(v) => put(&mut **v, n),
            IntSlot::I32(v) => put(&mut **v, n),
            IntSlot::I64(v) => put(&mut **v, n),
            IntSlot::U8(v) => put(&mut **v, n),
            IntSlot::U16(v) => put(&mut **v, n),
            IntSlot::U32(v) => put(&mut **v, n),
            IntSlot::U64(v) => put(&mut **v, n),
            IntSlot::Usize(v) => put(&mut **v, n),
        }
    }
}

impl IntWidth {
    pub fn fits(self, n: i64) -> bool {
        match self {
            IntWidth::I8 => i8::try_from(n).is_ok(),
            IntWidth::I16 => i16::try_from(n).is_ok(),
            IntWidth::I32 => i32::try_from(n).is_ok(),
            IntWidth::I64 => true,
            IntWidth::U8 => u8::try_from(n).is_ok(),
            IntWidth::U16 => u16::try_from(n).is_ok(),
            IntWidth::U32 => u32::try_from(n).is_ok(),
            IntWidth::U64 => u64::try_from(n).is_ok(),
            IntWidth::Usize => usize::try_from(n).is_ok(),
        }
    }
}

macro_rules! slot_from {
    ($($ty:ty => $ctor:expr),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Slot<'a> {
                fn from(v: &'a mut $ty) -> Self {
                    $ctor(v)
                }
            }
        )*
    };
}

slot_from! {
    String => Slot::Str,
    bool => Slot::Bool,
    i8 => |v| Slot::Int(IntSlot::I8(v)),
    i16 => |v| Slot::Int(IntSlot::I16(v)),
    i32 => |v| Slot::Int(IntSlot::I32(v)),
    i64 => |v| Slot::Int(IntSlot::I64(v)),
    u8 => |v| Slot::Int(IntSlot::U8(v)),
    u16 => |v| Slot::Int(IntSlot::U16(v)),
    u32 => |v| Slot::Int(IntSlot::U32(v)),
    u64 => |v| Slot::Int(IntSlot::U64(v)),
    usize => |v| Slot::Int(IntSlot::Usize(v)),
    Vec<String> => |v| Slot::Seq(SeqSlot::Str(v)),
    Vec<i64> => |v| Slot::Seq(SeqSlot::Int(v)),
    Vec<bool> => |v| Slot::Seq(SeqSlot::Bool(v)),
    Option<String> => |v| Slot::Opt(OptSlot::Str(v)),
    Option<i64> => |v| Slot::Opt(OptSlot::Int(v)),
    Option<bool> => |v| Slot::Opt(OptSlot::Bool(v)),
}
