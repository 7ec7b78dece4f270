//! Runtime values carried by the codec.
//!
//! [`Value`] covers the built-in wire types. Host applications carry their
//! own types through [`Value::Custom`] by implementing [`CustomValue`].

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Identity of an exact runtime type.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the concrete type `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Diagnostic name of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A named structural contract that many concrete types may satisfy.
///
/// A value satisfies a capability when its type lists it in
/// [`CustomValue::capabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability(&'static str);

impl Capability {
    /// A capability identified by `name`; equal names are the same capability.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The capability's name.
    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The runtime type of a value: its exact key plus the capabilities it declares.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeType {
    key: TypeKey,
    capabilities: &'static [Capability],
}

impl RuntimeType {
    /// Runtime type of `T` with no capabilities.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            capabilities: &[],
        }
    }

    /// A runtime type with an explicit capability list.
    pub fn with_capabilities(key: TypeKey, capabilities: &'static [Capability]) -> Self {
        Self { key, capabilities }
    }

    /// Key used for exact registry matches.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Host type name, used in error messages.
    pub fn name(&self) -> &'static str {
        self.key.name
    }

    /// Capabilities the type declares, in declaration order.
    pub fn capabilities(&self) -> &'static [Capability] {
        self.capabilities
    }

    /// Returns true if this type declares `capability`.
    pub fn satisfies(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// A host-defined value encoded through a custom type serializer.
pub trait CustomValue: Any + fmt::Debug + Send + Sync {
    /// Structural capabilities of this type, consulted when no serializer is
    /// registered for the exact type.
    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    /// Structural equality against another custom value.
    ///
    /// Implementations usually downcast with [`downcast`] and compare.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;

    /// Diagnostic type name.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Downcast a custom value to its concrete type.
pub fn downcast<T: CustomValue>(value: &dyn CustomValue) -> Option<&T> {
    let any: &dyn Any = value;
    any.downcast_ref::<T>()
}

/// Shared handle to a [`CustomValue`].
#[derive(Clone)]
pub struct Custom(Arc<dyn CustomValue>);

impl Custom {
    pub fn new<T: CustomValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn get(&self) -> &dyn CustomValue {
        self.0.as_ref()
    }

    pub fn downcast_ref<T: CustomValue>(&self) -> Option<&T> {
        downcast(self.get())
    }

    pub fn runtime_type(&self) -> RuntimeType {
        let inner = self.get();
        RuntimeType {
            key: TypeKey {
                id: inner.type_id(),
                name: inner.type_name(),
            },
            capabilities: inner.capabilities(),
        }
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl PartialEq for Custom {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_value(other.get())
    }
}

/// Calendar date as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date(pub i64);

/// Instant as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

macro_rules! epoch_millis {
    ($ty:ident) => {
        impl $ty {
            pub fn from_millis(millis: i64) -> Self {
                Self(millis)
            }

            pub fn millis(self) -> i64 {
                self.0
            }

            /// Convert to a `SystemTime`, `None` if out of range.
            pub fn to_system_time(self) -> Option<SystemTime> {
                let offset = Duration::from_millis(self.0.unsigned_abs());
                if self.0 >= 0 {
                    UNIX_EPOCH.checked_add(offset)
                } else {
                    UNIX_EPOCH.checked_sub(offset)
                }
            }
        }

        impl From<SystemTime> for $ty {
            fn from(time: SystemTime) -> Self {
                let millis = match time.duration_since(UNIX_EPOCH) {
                    Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
                    Err(err) => i64::try_from(err.duration().as_millis())
                        .map(|m| -m)
                        .unwrap_or(i64::MIN),
                };
                Self(millis)
            }
        }
    };
}

epoch_millis!(Date);
epoch_millis!(Timestamp);

/// Unordered collection encoded as SET. Element order is kept as inserted
/// but ignored by equality.
#[derive(Debug, Clone, Default)]
pub struct ValueSet(Vec<Value>);

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless an equal element is present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Key/value collection encoded as MAP. Entry order is kept as inserted
/// but ignored by equality.
#[derive(Debug, Clone, Default)]
pub struct ValueMap(Vec<(Value, Value)>);

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Value, Value)> {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// A named variable bound to a value inside a query program.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    variable: String,
    value: Box<Value>,
}

impl Binding {
    pub fn new(variable: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            variable: variable.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// One operation of a query program and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    operator: String,
    arguments: Vec<Value>,
}

impl Instruction {
    pub fn new(operator: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            operator: operator.into(),
            arguments,
        }
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}

/// A query program: source instructions followed by step instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    sources: Vec<Instruction>,
    steps: Vec<Instruction>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, operator: impl Into<String>, arguments: Vec<Value>) {
        self.sources.push(Instruction::new(operator, arguments));
    }

    pub fn add_step(&mut self, operator: impl Into<String>, arguments: Vec<Value>) {
        self.steps.push(Instruction::new(operator, arguments));
    }

    pub fn sources(&self) -> &[Instruction] {
        &self.sources
    }

    pub fn steps(&self) -> &[Instruction] {
        &self.steps
    }

    /// Variable bindings appearing as direct instruction arguments.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.sources
            .iter()
            .chain(self.steps.iter())
            .flat_map(|instruction| instruction.arguments.iter())
            .filter_map(|argument| match argument {
                Value::Binding(binding) => Some(binding),
                _ => None,
            })
    }

    pub(crate) fn from_parts(sources: Vec<Instruction>, steps: Vec<Instruction>) -> Self {
        Self { sources, steps }
    }
}

/// A value that can be written to or read from GraphBinary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null without type information.
    Null,
    /// Null of a known data type.
    TypedNull(crate::DataType),
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Uuid(Uuid),
    Date(Date),
    Timestamp(Timestamp),
    List(Vec<Value>),
    Set(ValueSet),
    Map(ValueMap),
    Binding(Binding),
    Bytecode(Bytecode),
    Custom(Custom),
}

impl Value {
    /// Runtime type used for serializer dispatch. Nulls have none.
    pub fn runtime_type(&self) -> Option<RuntimeType> {
        let runtime = match self {
            Value::Null | Value::TypedNull(_) => return None,
            Value::Boolean(_) => RuntimeType::of::<bool>(),
            Value::Byte(_) => RuntimeType::of::<i8>(),
            Value::Short(_) => RuntimeType::of::<i16>(),
            Value::Int(_) => RuntimeType::of::<i32>(),
            Value::Long(_) => RuntimeType::of::<i64>(),
            Value::Float(_) => RuntimeType::of::<f32>(),
            Value::Double(_) => RuntimeType::of::<f64>(),
            Value::String(_) => RuntimeType::of::<String>(),
            Value::Uuid(_) => RuntimeType::of::<Uuid>(),
            Value::Date(_) => RuntimeType::of::<Date>(),
            Value::Timestamp(_) => RuntimeType::of::<Timestamp>(),
            Value::List(_) => RuntimeType::of::<Vec<Value>>(),
            Value::Set(_) => RuntimeType::of::<ValueSet>(),
            Value::Map(_) => RuntimeType::of::<ValueMap>(),
            Value::Binding(_) => RuntimeType::of::<Binding>(),
            Value::Bytecode(_) => RuntimeType::of::<Bytecode>(),
            Value::Custom(custom) => custom.runtime_type(),
        };
        Some(runtime)
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::TypedNull(_) => "typed null",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Binding(_) => "binding",
            Value::Bytecode(_) => "bytecode",
            Value::Custom(_) => "custom",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::TypedNull(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )+
    };
}

value_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Uuid => Uuid,
    Date => Date,
    Timestamp => Timestamp,
    Vec<Value> => List,
    ValueSet => Set,
    ValueMap => Map,
    Binding => Binding,
    Bytecode => Bytecode,
    Custom => Custom,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    const SHAPE: Capability = Capability::new("test.shape");

    impl CustomValue for Point {
        fn capabilities(&self) -> &'static [Capability] {
            &[SHAPE]
        }

        fn eq_value(&self, other: &dyn CustomValue) -> bool {
            downcast::<Point>(other) == Some(self)
        }
    }

    #[test]
    fn custom_runtime_type_is_concrete() {
        let custom = Custom::new(Point { x: 1, y: 2 });
        let runtime = custom.runtime_type();
        assert_eq!(runtime.key(), TypeKey::of::<Point>());
        assert!(runtime.satisfies(SHAPE));
        assert!(!runtime.satisfies(Capability::new("test.other")));
    }

    #[test]
    fn custom_equality_and_downcast() {
        let a = Custom::new(Point { x: 1, y: 2 });
        let b = Custom::new(Point { x: 1, y: 2 });
        let c = Custom::new(Point { x: 3, y: 4 });
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));
    }

    #[test]
    fn list_and_set_have_distinct_runtime_types() {
        let list = Value::List(vec![]).runtime_type().unwrap();
        let set = Value::Set(ValueSet::new()).runtime_type().unwrap();
        assert_ne!(list.key(), set.key());
        assert!(Value::Null.runtime_type().is_none());
    }

    #[test]
    fn map_insert_replaces_equal_key() {
        let mut map = ValueMap::new();
        assert_eq!(map.insert("a".into(), 1.into()), None);
        assert_eq!(map.insert("a".into(), 2.into()), Some(Value::Int(1)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"a".into()), Some(&Value::Int(2)));
    }

    #[test]
    fn set_ignores_duplicates() {
        let set: ValueSet = vec![Value::Int(1), Value::Int(1), Value::Int(2)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn collection_equality_ignores_order() {
        let a: ValueSet = [Value::Int(1), Value::Int(2)].into_iter().collect();
        let b: ValueSet = [Value::Int(2), Value::Int(1)].into_iter().collect();
        assert_eq!(a, b);

        let x = Value::from("x");
        let y = Value::from("y");
        let a: ValueMap = [(x.clone(), Value::Int(1)), (y.clone(), Value::Int(2))]
            .into_iter()
            .collect();
        let b: ValueMap = [(y, Value::Int(2)), (x.clone(), Value::Int(1))]
            .into_iter()
            .collect();
        assert_eq!(a, b);

        let c: ValueMap = [(x, Value::Int(1))].into_iter().collect();
        assert_ne!(a, c);
        assert_ne!(
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![Value::Int(2), Value::Int(1)])
        );
    }

    #[test]
    fn bytecode_collects_bindings() {
        let mut bytecode = Bytecode::new();
        bytecode.add_source("withSack", vec![Value::Int(1)]);
        bytecode.add_step("V", vec![Binding::new("x", 42).into()]);
        bytecode.add_step("has", vec!["name".into(), Binding::new("n", "marko").into()]);

        let names: Vec<&str> = bytecode.bindings().map(Binding::variable).collect();
        assert_eq!(names, vec!["x", "n"]);
    }

    #[test]
    fn epoch_millis_convert_to_system_time() {
        let date = Date::from_millis(1_000);
        assert_eq!(
            date.to_system_time(),
            Some(UNIX_EPOCH + Duration::from_secs(1))
        );
        assert_eq!(Timestamp::from(UNIX_EPOCH + Duration::from_millis(5)).millis(), 5);
        let before = Date::from_millis(-2_000);
        assert_eq!(Date::from(before.to_system_time().unwrap()), before);
    }
}
