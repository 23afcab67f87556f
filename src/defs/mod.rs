// ABOUTME: Command and TLV schemas plus the process-wide registry they are looked up in
// ABOUTME: Lookups work by name and by numeric id; registration keeps both directions in step

mod commands;
mod tlvs;

use crate::filters::Filter;
use crate::types::{TlvType, Value, WireType};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard};
use thiserror::Error;
use tracing::debug;

/// How a schema field is populated when the caller does not set it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDefault {
    /// Use the wire type's default
    #[default]
    Type,
    Value(Value),
    /// Leave the field out so encoding can infer it
    Unset,
}

/// A mandatory field of a command, in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub wire_type: WireType,
    pub default: FieldDefault,
    pub filter: Option<Filter>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, wire_type: WireType) -> Self {
        FieldDef {
            name: name.into(),
            wire_type,
            default: FieldDefault::Type,
            filter: None,
        }
    }

    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// A fresh default value for a new PDU, if the field gets one.
    pub fn initial_value(&self) -> Option<Value> {
        match &self.default {
            FieldDefault::Type => Some(self.wire_type.default_value()),
            FieldDefault::Value(v) => Some(v.clone()),
            FieldDefault::Unset => None,
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.wire_type.accepts(value) || self.filter.is_some_and(|f| f.accepts(value))
    }
}

/// Schema of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDef {
    pub id: u32,
    pub name: String,
    pub fields: Vec<FieldDef>,
    /// TLV tag to the field name it is stored under for this command
    pub tlv_remap: HashMap<String, String>,
}

impl CommandDef {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        CommandDef {
            id,
            name: name.into(),
            fields: Vec::new(),
            tlv_remap: HashMap::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn remap(mut self, tag: impl Into<String>, field: impl Into<String>) -> Self {
        self.tlv_remap.insert(tag.into(), field.into());
        self
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_response(&self) -> bool {
        self.id & crate::codec::RESPONSE_BIT != 0
    }
}

/// Definition of an optional parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TlvDef {
    pub tag: String,
    pub id: u16,
    pub tlv_type: TlvType,
    pub filter: Option<Filter>,
    /// The tag may occur more than once; values are kept as a list
    pub multiple: bool,
}

impl TlvDef {
    pub fn new(tag: impl Into<String>, id: u16, tlv_type: TlvType) -> Self {
        TlvDef {
            tag: tag.into(),
            id,
            tlv_type,
            filter: None,
            multiple: false,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn accepts(&self, value: &Value) -> bool {
        let single = |v: &Value| {
            self.tlv_type.accepts(v) || self.filter.is_some_and(|f| f.accepts(v))
        };
        match value {
            Value::List(items) if self.multiple => items.iter().all(single),
            other => single(other),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command id {0:#010x} is already registered")]
    DuplicateCommandId(u32),

    #[error("Command '{0}' is already registered")]
    DuplicateCommandName(String),

    #[error("TLV id {0:#06x} is already registered")]
    DuplicateTlvId(u16),

    #[error("TLV '{0}' is already registered")]
    DuplicateTlvTag(String),

    #[error("Cannot alias unknown TLV '{0}'")]
    UnknownTlv(String),
}

/// Command and TLV lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: HashMap<String, Arc<CommandDef>>,
    commands_by_id: HashMap<u32, Arc<CommandDef>>,
    tlvs: HashMap<String, Arc<TlvDef>>,
    tlvs_by_id: HashMap<u16, Arc<TlvDef>>,
}

impl Registry {
    /// Registry holding every standard SMPP v3.4 and v5.0 command and TLV.
    pub fn standard() -> Self {
        let mut registry = Registry::default();
        for def in commands::standard() {
            registry.insert_command(def);
        }
        for def in tlvs::standard() {
            registry.insert_tlv(def);
        }
        for (alias, tag) in tlvs::ALIASES {
            if let Some(def) = registry.tlvs.get(*tag).cloned() {
                registry.tlvs.insert((*alias).to_string(), def);
            }
        }
        registry
    }

    fn insert_command(&mut self, def: CommandDef) {
        let def = Arc::new(def);
        self.commands_by_id.insert(def.id, Arc::clone(&def));
        self.commands.insert(def.name.clone(), def);
    }

    fn insert_tlv(&mut self, def: TlvDef) {
        let def = Arc::new(def);
        self.tlvs_by_id.insert(def.id, Arc::clone(&def));
        self.tlvs.insert(def.tag.clone(), def);
    }

    pub fn register_command(&mut self, def: CommandDef) -> Result<(), RegistryError> {
        if self.commands_by_id.contains_key(&def.id) {
            return Err(RegistryError::DuplicateCommandId(def.id));
        }
        if self.commands.contains_key(&def.name) {
            return Err(RegistryError::DuplicateCommandName(def.name));
        }
        debug!("Registering command {} ({:#010x})", def.name, def.id);
        self.insert_command(def);
        Ok(())
    }

    pub fn register_tlv(&mut self, def: TlvDef) -> Result<(), RegistryError> {
        if self.tlvs_by_id.contains_key(&def.id) {
            return Err(RegistryError::DuplicateTlvId(def.id));
        }
        if self.tlvs.contains_key(&def.tag) {
            return Err(RegistryError::DuplicateTlvTag(def.tag));
        }
        debug!("Registering TLV {} ({:#06x})", def.tag, def.id);
        self.insert_tlv(def);
        Ok(())
    }

    /// Make `alias` resolve to the TLV registered as `tag`.
    pub fn register_tlv_alias(&mut self, alias: &str, tag: &str) -> Result<(), RegistryError> {
        if self.tlvs.contains_key(alias) {
            return Err(RegistryError::DuplicateTlvTag(alias.to_string()));
        }
        let def = self
            .tlvs
            .get(tag)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTlv(tag.to_string()))?;
        self.tlvs.insert(alias.to_string(), def);
        Ok(())
    }

    pub fn command(&self, name: &str) -> Option<&Arc<CommandDef>> {
        self.commands.get(name)
    }

    pub fn command_by_id(&self, id: u32) -> Option<&Arc<CommandDef>> {
        self.commands_by_id.get(&id)
    }

    pub fn tlv(&self, tag: &str) -> Option<&Arc<TlvDef>> {
        self.tlvs.get(tag)
    }

    pub fn tlv_by_id(&self, id: u16) -> Option<&Arc<TlvDef>> {
        self.tlvs_by_id.get(&id)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Arc<CommandDef>> {
        self.commands_by_id.values()
    }
}

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::standard()));

/// Shared read access to the process-wide registry.
pub fn registry() -> RwLockReadGuard<'static, Registry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Add a command to the process-wide registry.
pub fn register_command(def: CommandDef) -> Result<(), RegistryError> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_command(def)
}

/// Add a TLV to the process-wide registry.
pub fn register_tlv(def: TlvDef) -> Result<(), RegistryError> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_tlv(def)
}

pub fn register_tlv_alias(alias: &str, tag: &str) -> Result<(), RegistryError> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_tlv_alias(alias, tag)
}
