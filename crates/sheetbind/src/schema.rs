//! Field descriptor tables.
//!
//! A record type opts into sheet binding by implementing [`SheetRecord`],
//! usually through `#[derive(SheetRecord)]`. The implementation registers one
//! `(display name, order, getter, setter)` entry per mapped field; everything
//! downstream (header matching, coercion, column placement) works from that
//! table and never from the record's shape.

use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::CoercionError;

/// Declared representation of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Byte,
    Short,
    Int,
    Float,
    Double,
    String,
    Date,
    /// Anything else; coerced like `String`.
    Unknown,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeTag::Bool => "bool",
            TypeTag::Byte => "byte",
            TypeTag::Short => "short",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::String => "string",
            TypeTag::Date => "date",
            TypeTag::Unknown => "unknown",
        })
    }
}

/// A cell value after coercion, ready to be stored into a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    Double(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Byte(_) => "byte",
            FieldValue::Short(_) => "short",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::Text(_) => "text",
            FieldValue::Date(_) => "date",
        }
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    fn mismatch(self, expected: TypeTag) -> CoercionError {
        CoercionError::TypeMismatch {
            expected,
            found: format!("{} {self:?}", self.kind()),
        }
    }
}

/// A Rust type that can sit behind a mapped field.
///
/// Numeric types accept narrower coerced values (a `Short` fits an `i32`
/// field). Every non-text type treats an empty text value, which is what a
/// blank cell coerces to, as its default.
pub trait CellField: Sized {
    const TYPE_TAG: TypeTag;

    fn from_value(value: FieldValue) -> Result<Self, CoercionError>;

    /// Generic textual representation used when writing.
    fn to_text(&self) -> String;
}

macro_rules! numeric_field {
    ($ty:ty, $tag:expr, [$($variant:ident),*] $(, $extra:ident => $conv:expr)?) => {
        impl CellField for $ty {
            const TYPE_TAG: TypeTag = $tag;

            fn from_value(value: FieldValue) -> Result<Self, CoercionError> {
                match value {
                    $(FieldValue::$variant(v) => Ok(<$ty>::from(v)),)*
                    $(FieldValue::$extra(v) => Ok(($conv)(v)),)?
                    v if v.is_empty_text() => Ok(<$ty>::default()),
                    v => Err(v.mismatch(Self::TYPE_TAG)),
                }
            }

            fn to_text(&self) -> String {
                self.to_string()
            }
        }
    };
}

numeric_field!(i8, TypeTag::Byte, [Byte]);
numeric_field!(i16, TypeTag::Short, [Byte, Short]);
numeric_field!(i32, TypeTag::Int, [Byte, Short, Int]);
numeric_field!(i64, TypeTag::Double, [Byte, Short, Int], Double => |v: f64| v as i64);
numeric_field!(f32, TypeTag::Float, [Byte, Short, Float]);
numeric_field!(f64, TypeTag::Double, [Byte, Short, Int, Float, Double]);

impl CellField for bool {
    const TYPE_TAG: TypeTag = TypeTag::Bool;

    fn from_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            v if v.is_empty_text() => Ok(false),
            v => Err(v.mismatch(Self::TYPE_TAG)),
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl CellField for String {
    const TYPE_TAG: TypeTag = TypeTag::String;

    fn from_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Text(s) => Ok(s),
            v => Err(v.mismatch(Self::TYPE_TAG)),
        }
    }

    fn to_text(&self) -> String {
        self.clone()
    }
}

impl CellField for NaiveDateTime {
    const TYPE_TAG: TypeTag = TypeTag::Date;

    fn from_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Date(dt) => Ok(dt),
            v if v.is_empty_text() => Ok(NaiveDateTime::default()),
            v => Err(v.mismatch(Self::TYPE_TAG)),
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl CellField for NaiveDate {
    const TYPE_TAG: TypeTag = TypeTag::Date;

    fn from_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Date(dt) => Ok(dt.date()),
            v if v.is_empty_text() => Ok(NaiveDate::default()),
            v => Err(v.mismatch(Self::TYPE_TAG)),
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

/// `None` for blank cells, otherwise whatever `T` accepts.
impl<T: CellField> CellField for Option<T> {
    const TYPE_TAG: TypeTag = T::TYPE_TAG;

    fn from_value(value: FieldValue) -> Result<Self, CoercionError> {
        if value.is_empty_text() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }

    fn to_text(&self) -> String {
        self.as_ref().map(CellField::to_text).unwrap_or_default()
    }
}

/// Static metadata binding one record field to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    type_tag: TypeTag,
    order: i32,
    index: usize,
}

impl FieldDescriptor {
    /// Header text this field is matched against.
    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Position in declaration order.
    pub fn index(&self) -> usize {
        self.index
    }
}

type Getter<T> = Box<dyn Fn(&T) -> String>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> Result<(), CoercionError>>;

struct FieldAccessor<T> {
    get: Getter<T>,
    set: Setter<T>,
}

/// Ordered descriptor table plus accessors for a record type `T`.
pub struct FieldSchema<T> {
    descriptors: Vec<FieldDescriptor>,
    accessors: Vec<FieldAccessor<T>>,
    by_name: FxHashMap<String, usize>,
}

impl<T: 'static> FieldSchema<T> {
    pub fn builder() -> FieldSchemaBuilder<T> {
        FieldSchemaBuilder { fields: Vec::new() }
    }
}

impl<T> FieldSchema<T> {
    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Exact-match lookup; with duplicate display names the first declared wins.
    pub fn by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.descriptors[i])
    }

    /// Descriptors sorted by ascending `order`, ties kept in declaration order.
    pub fn ordered(&self) -> Vec<&FieldDescriptor> {
        let mut out: Vec<&FieldDescriptor> = self.descriptors.iter().collect();
        out.sort_by_key(|d| d.order);
        out
    }

    pub fn set(
        &self,
        record: &mut T,
        descriptor: &FieldDescriptor,
        value: FieldValue,
    ) -> Result<(), CoercionError> {
        (self.accessors[descriptor.index].set)(record, value)
    }

    pub fn text(&self, record: &T, descriptor: &FieldDescriptor) -> String {
        (self.accessors[descriptor.index].get)(record)
    }
}

impl<T> fmt::Debug for FieldSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

pub struct FieldSchemaBuilder<T> {
    fields: Vec<(FieldDescriptor, FieldAccessor<T>)>,
}

impl<T: 'static> FieldSchemaBuilder<T> {
    /// Register a field through a pair of projections onto the record.
    pub fn field<F: CellField + 'static>(
        mut self,
        name: impl Into<String>,
        order: i32,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        let descriptor = FieldDescriptor {
            name: name.into(),
            type_tag: F::TYPE_TAG,
            order,
            index: self.fields.len(),
        };
        let accessor = FieldAccessor {
            get: Box::new(move |record: &T| get(record).to_text()),
            set: Box::new(move |record: &mut T, value: FieldValue| {
                *get_mut(record) = F::from_value(value)?;
                Ok(())
            }),
        };
        self.fields.push((descriptor, accessor));
        self
    }

    /// Register a field with an explicit type tag and hand-written accessors,
    /// for fields that are computed or stored in a different shape.
    pub fn custom_field(
        mut self,
        name: impl Into<String>,
        order: i32,
        type_tag: TypeTag,
        get: impl Fn(&T) -> String + 'static,
        set: impl Fn(&mut T, FieldValue) -> Result<(), CoercionError> + 'static,
    ) -> Self {
        let descriptor = FieldDescriptor {
            name: name.into(),
            type_tag,
            order,
            index: self.fields.len(),
        };
        let accessor = FieldAccessor {
            get: Box::new(get),
            set: Box::new(set),
        };
        self.fields.push((descriptor, accessor));
        self
    }

    pub fn build(self) -> FieldSchema<T> {
        let mut descriptors = Vec::with_capacity(self.fields.len());
        let mut accessors = Vec::with_capacity(self.fields.len());
        let mut by_name = FxHashMap::default();
        for (descriptor, accessor) in self.fields {
            if by_name.contains_key(&descriptor.name) {
                tracing::warn!(
                    field = descriptor.name.as_str(),
                    "duplicate display name; the first declaration wins header matching"
                );
            } else {
                by_name.insert(descriptor.name.clone(), descriptor.index);
            }
            descriptors.push(descriptor);
            accessors.push(accessor);
        }
        FieldSchema {
            descriptors,
            accessors,
            by_name,
        }
    }
}

/// A record type whose fields can be bound to spreadsheet columns.
///
/// `Default` supplies the zero-initialized instance each row starts from.
pub trait SheetRecord: Default + 'static {
    fn schema() -> FieldSchema<Self>;
}
