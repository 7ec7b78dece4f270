//! Built-in serializers.

mod binding;
mod bytecode;
mod collection;
mod date;
mod primitive;
mod string;
mod uuid;

use std::sync::Arc;

pub use binding::BindingSerializer;
pub use bytecode::BytecodeSerializer;
pub use collection::{ListSerializer, MapSerializer, SetSerializer};
pub use date::DateSerializer;
pub use primitive::{
    BooleanSerializer, ByteSerializer, DoubleSerializer, FloatSerializer, IntSerializer,
    LongSerializer, ShortSerializer,
};
pub use string::StringSerializer;
pub use self::uuid::UuidSerializer;

use crate::registry::TypeSelector;
use crate::serializer::TypeSerializer;
use crate::value::{Binding, Bytecode, Date, Timestamp, Value, ValueMap, ValueSet};

type Registration = (TypeSelector, Arc<dyn TypeSerializer>);

fn exact<T: 'static, S: TypeSerializer + 'static>(serializer: S) -> Registration {
    (TypeSelector::exact::<T>(), Arc::new(serializer))
}

/// Built-in registrations, in registration order.
pub(crate) fn default_serializers() -> Vec<Registration> {
    vec![
        exact::<String, _>(StringSerializer),
        exact::<::uuid::Uuid, _>(UuidSerializer),
        exact::<ValueMap, _>(MapSerializer),
        exact::<Vec<Value>, _>(ListSerializer),
        exact::<ValueSet, _>(SetSerializer),
        exact::<i32, _>(IntSerializer),
        exact::<i64, _>(LongSerializer),
        exact::<f64, _>(DoubleSerializer),
        exact::<f32, _>(FloatSerializer),
        exact::<i16, _>(ShortSerializer),
        exact::<bool, _>(BooleanSerializer),
        exact::<i8, _>(ByteSerializer),
        exact::<Timestamp, _>(DateSerializer::timestamp()),
        exact::<Date, _>(DateSerializer::date()),
        exact::<Binding, _>(BindingSerializer),
        exact::<Bytecode, _>(BytecodeSerializer),
    ]
}
