use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace, warn};

use crate::data_type::DataType;
use crate::error::{ConfigError, Result, SerializationError};
use crate::serializer::{CustomTypeSerializer, TypeSerializer};
use crate::types;
use crate::value::{Capability, RuntimeType, TypeKey, Value};

/// Selects the runtime types a serializer is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSelector {
    /// Exactly one concrete type.
    Exact(TypeKey),
    /// Any type declaring the capability.
    Capability(Capability),
}

impl TypeSelector {
    /// Select exactly the type `T`.
    pub fn exact<T: Any + ?Sized>() -> Self {
        TypeSelector::Exact(TypeKey::of::<T>())
    }

    /// Select every type declaring `capability`.
    pub fn capability(capability: Capability) -> Self {
        TypeSelector::Capability(capability)
    }
}

impl From<TypeKey> for TypeSelector {
    fn from(key: TypeKey) -> Self {
        TypeSelector::Exact(key)
    }
}

impl From<Capability> for TypeSelector {
    fn from(capability: Capability) -> Self {
        TypeSelector::Capability(capability)
    }
}

/// A serializer resolved for a runtime type.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Written under its own type code.
    BuiltIn(&'a dyn TypeSerializer),
    /// Written under CUSTOM followed by its type name.
    Custom(&'a dyn CustomTypeSerializer),
}

impl<'a> Resolved<'a> {
    /// The serializer, whichever way it was registered.
    pub fn serializer(self) -> &'a dyn TypeSerializer {
        match self {
            Resolved::BuiltIn(serializer) => serializer,
            Resolved::Custom(custom) => custom,
        }
    }
}

#[derive(Debug, Clone)]
enum Registered {
    BuiltIn(Arc<dyn TypeSerializer>),
    Custom(Arc<dyn CustomTypeSerializer>),
}

impl Registered {
    fn resolved(&self) -> Resolved<'_> {
        match self {
            Registered::BuiltIn(serializer) => Resolved::BuiltIn(serializer.as_ref()),
            Registered::Custom(custom) => Resolved::Custom(custom.as_ref()),
        }
    }
}

#[derive(Debug)]
struct RegistryEntry {
    selector: TypeSelector,
    serializer: Registered,
}

/// Accumulates serializer registrations for a [`TypeSerializerRegistry`].
///
/// Every entry is validated when it is added; [`create`](Self::create) can
/// not fail.
#[derive(Debug)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    /// A builder with no serializers, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A builder preloaded with every built-in serializer.
    pub fn with_defaults() -> Self {
        let entries = types::default_serializers()
            .into_iter()
            .map(|(selector, serializer)| RegistryEntry {
                selector,
                serializer: Registered::BuiltIn(serializer),
            })
            .collect();
        Self { entries }
    }

    /// Register a serializer for a built-in wire type.
    ///
    /// Rejects CUSTOM and UNSPECIFIED_NULL data types and custom type
    /// serializers, which must go through [`add_custom_type`](Self::add_custom_type).
    pub fn add<S>(
        mut self,
        selector: impl Into<TypeSelector>,
        serializer: S,
    ) -> std::result::Result<Self, ConfigError>
    where
        S: TypeSerializer + 'static,
    {
        match serializer.data_type() {
            DataType::Custom => return Err(ConfigError::CustomDataType),
            DataType::UnspecifiedNull => return Err(ConfigError::UnspecifiedNull),
            _ => {}
        }
        if serializer.as_custom().is_some() {
            return Err(ConfigError::CustomSerializerNotAllowed);
        }

        self.entries.push(RegistryEntry {
            selector: selector.into(),
            serializer: Registered::BuiltIn(Arc::new(serializer)),
        });
        Ok(self)
    }

    /// Register a serializer for a host type identified on the wire by name.
    pub fn add_custom_type<S>(
        mut self,
        selector: impl Into<TypeSelector>,
        serializer: S,
    ) -> std::result::Result<Self, ConfigError>
    where
        S: CustomTypeSerializer + 'static,
    {
        let data_type = serializer.data_type();
        if data_type != DataType::Custom {
            return Err(ConfigError::NotCustomDataType(data_type));
        }
        if serializer.type_name().is_empty() {
            return Err(ConfigError::EmptyCustomTypeName);
        }

        self.entries.push(RegistryEntry {
            selector: selector.into(),
            serializer: Registered::Custom(Arc::new(serializer)),
        });
        Ok(self)
    }

    /// Finalize the registrations into an immutable registry.
    pub fn create(self) -> TypeSerializerRegistry {
        let mut registry = TypeSerializerRegistry {
            by_type: HashMap::new(),
            by_capability: Vec::new(),
            by_data_type: HashMap::new(),
            by_custom_name: HashMap::new(),
        };
        for entry in self.entries {
            registry.put(entry);
        }

        debug!(
            exact = registry.by_type.len(),
            capabilities = registry.by_capability.len(),
            data_types = registry.by_data_type.len(),
            custom_types = registry.by_custom_name.len(),
            "type serializer registry created"
        );
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Immutable dispatch table from runtime types, data types and custom type
/// names to serializers.
///
/// Lookups never mutate, so one registry can be shared across threads.
pub struct TypeSerializerRegistry {
    by_type: HashMap<TypeKey, Registered>,
    by_capability: Vec<(Capability, Registered)>,
    by_data_type: HashMap<DataType, Arc<dyn TypeSerializer>>,
    by_custom_name: HashMap<String, Arc<dyn CustomTypeSerializer>>,
}

impl TypeSerializerRegistry {
    /// Builder preloaded with the built-in serializers.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::with_defaults()
    }

    /// Process-wide registry holding the built-in serializers.
    pub fn shared() -> &'static TypeSerializerRegistry {
        static SHARED: OnceLock<TypeSerializerRegistry> = OnceLock::new();
        SHARED.get_or_init(|| RegistryBuilder::with_defaults().create())
    }

    fn put(&mut self, entry: RegistryEntry) {
        let RegistryEntry {
            selector,
            serializer,
        } = entry;

        match selector {
            TypeSelector::Exact(key) => {
                self.by_type.insert(key, serializer.clone());
            }
            TypeSelector::Capability(capability) => {
                match self
                    .by_capability
                    .iter_mut()
                    .find(|(existing, _)| *existing == capability)
                {
                    Some((_, slot)) => *slot = serializer.clone(),
                    None => self.by_capability.push((capability, serializer.clone())),
                }
            }
        }

        match serializer {
            Registered::Custom(custom) => {
                let name = custom.type_name().to_string();
                if self.by_custom_name.insert(name.clone(), custom).is_some() {
                    warn!(name = %name, "custom type serializer shadowed by later registration");
                }
            }
            Registered::BuiltIn(serializer) => {
                let data_type = serializer.data_type();
                if self.by_data_type.insert(data_type, serializer).is_some() {
                    debug!(%data_type, "data type serializer replaced by later registration");
                }
            }
        }
    }

    /// Resolve the serializer for a runtime type.
    ///
    /// Exact registrations win. Otherwise capability registrations are tried
    /// in registration order and the first one the type satisfies is used.
    pub fn serializer_for_type(&self, runtime: &RuntimeType) -> Result<&dyn TypeSerializer> {
        self.resolve_type(runtime).map(Resolved::serializer)
    }

    /// Resolve the serializer for a non-null value by its runtime type.
    pub fn serializer_for_value(&self, value: &Value) -> Result<&dyn TypeSerializer> {
        self.resolve_value(value).map(Resolved::serializer)
    }

    /// Like [`serializer_for_type`](Self::serializer_for_type), also telling
    /// whether the match was registered as a custom type.
    pub fn resolve_type(&self, runtime: &RuntimeType) -> Result<Resolved<'_>> {
        if let Some(registered) = self.by_type.get(&runtime.key()) {
            return Ok(registered.resolved());
        }

        self.by_capability
            .iter()
            .find(|(capability, _)| runtime.satisfies(*capability))
            .map(|(_, registered)| registered.resolved())
            .ok_or_else(|| {
                trace!(type_name = runtime.name(), "no serializer for runtime type");
                SerializationError::SerializerNotFound(runtime.name().to_string())
            })
    }

    /// Resolve a non-null value by its runtime type.
    pub fn resolve_value(&self, value: &Value) -> Result<Resolved<'_>> {
        let runtime = value
            .runtime_type()
            .ok_or(SerializationError::UnexpectedNull)?;
        self.resolve_type(&runtime)
    }

    /// Resolve the serializer for a wire data type. CUSTOM is rejected: custom
    /// serializers are resolved by name.
    pub fn serializer_for_data_type(&self, data_type: DataType) -> Result<&dyn TypeSerializer> {
        if data_type == DataType::Custom {
            return Err(SerializationError::CustomLookupByDataType);
        }

        self.by_data_type
            .get(&data_type)
            .map(|serializer| serializer.as_ref())
            .ok_or_else(|| {
                trace!(%data_type, "no serializer for data type");
                SerializationError::DataTypeNotFound(data_type)
            })
    }

    /// Resolve a custom type serializer by its wire name.
    pub fn serializer_for_custom_type(&self, name: &str) -> Result<&dyn CustomTypeSerializer> {
        self.by_custom_name
            .get(name)
            .map(|serializer| serializer.as_ref())
            .ok_or_else(|| {
                trace!(name, "no serializer for custom type");
                SerializationError::CustomTypeNotFound(name.to_string())
            })
    }

    /// Data types with a registered serializer, in code order.
    pub fn data_types(&self) -> Vec<DataType> {
        let mut data_types: Vec<DataType> = self.by_data_type.keys().copied().collect();
        data_types.sort_unstable();
        data_types
    }

    /// Registered custom type names, sorted.
    pub fn custom_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_custom_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Capabilities with a registered serializer, in dispatch order.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.by_capability
            .iter()
            .map(|(capability, _)| *capability)
            .collect()
    }
}

impl Default for TypeSerializerRegistry {
    fn default() -> Self {
        RegistryBuilder::with_defaults().create()
    }
}

impl std::fmt::Debug for TypeSerializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSerializerRegistry")
            .field("exact", &self.by_type.len())
            .field("capabilities", &self.capabilities())
            .field("data_types", &self.data_types())
            .field("custom_types", &self.custom_type_names())
            .finish()
    }
}
