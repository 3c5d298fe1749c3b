//! Dual-mode value binding.
//!
//! A form's values live in a [`BindingStore`]. In controlled mode the store
//! is the canonical state and every write bumps a revision so the owner knows
//! to re-render. In uncontrolled mode values live in a registry of native
//! control values; a field's binding only registers the control and reads it
//! lazily, and writes arrive as native input events through
//! [`Registry::write`].
//!
//! The field renderer sees only the [`FieldBinding`] trait and never inspects
//! the mode.

use formgen_core::{BindingMode, FormData, Value};

use crate::descriptor::FieldDescriptor;
use crate::kinds::FieldKind;

/// How a native control is wired up in uncontrolled mode.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRegistration {
    /// The `name` attribute the control registers under.
    pub name: String,
    /// The value the native control starts with.
    pub value: Value,
}

/// Access to one field's current value.
pub trait FieldBinding {
    /// Returns the binding mode this adapter implements.
    fn mode(&self) -> BindingMode;

    /// Returns the field's current value.
    fn get(&self) -> Value;

    /// Requests a value change.
    ///
    /// Controlled bindings update the canonical state synchronously;
    /// uncontrolled bindings ignore the call.
    fn set(&mut self, value: Value);

    /// Returns the native registration, if the control registers itself.
    fn register_native(&self) -> Option<NativeRegistration>;
}

/// Normalizes a value for the given kind: checkbox values become booleans.
pub fn normalize(kind: &FieldKind, value: Value) -> Value {
    if *kind == FieldKind::Checkbox {
        Value::Bool(value.as_checkbox())
    } else {
        value
    }
}

/// Carries a stored value across a change of field kind.
///
/// Entering a checkbox normalizes to a boolean. Leaving one turns a checked
/// box into the native `"on"` value and an unchecked box into a blank.
pub fn convert_kind(from: &FieldKind, to: &FieldKind, value: Value) -> Value {
    match value {
        _ if *to == FieldKind::Checkbox => normalize(to, value),
        Value::Bool(checked) if *from == FieldKind::Checkbox => {
            Value::String(if checked { "on" } else { "" }.to_string())
        }
        other => other,
    }
}

/// Canonical value state for controlled forms.
#[derive(Debug, Clone, Default)]
pub struct ControlledState {
    values: FormData,
    revision: u64,
}

impl ControlledState {
    /// Creates state seeded with `values`.
    pub const fn new(values: FormData) -> Self {
        Self {
            values,
            revision: 0,
        }
    }

    /// Returns the number of changes applied since creation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Native control values for uncontrolled forms.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    values: FormData,
    registered: Vec<String>,
}

impl Registry {
    /// Creates a registry whose controls start with `values`.
    pub const fn new(values: FormData) -> Self {
        Self {
            values,
            registered: Vec::new(),
        }
    }

    /// Registers a native control. Registering twice is a no-op.
    pub fn register(&mut self, name: &str) {
        if !self.registered.iter().any(|n| n == name) {
            self.registered.push(name.to_string());
        }
    }

    /// Records a native input event.
    pub fn write(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Reads a native control's current value.
    pub fn read(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or_default()
    }
}

/// Where a form's values live.
#[derive(Debug, Clone)]
pub enum BindingStore {
    /// Canonical state owned by the form's caller.
    Controlled(ControlledState),
    /// Native control registry.
    Uncontrolled(Registry),
}

impl BindingStore {
    /// Creates an empty store for `mode` seeded with `values`.
    pub fn new(mode: BindingMode, values: FormData) -> Self {
        match mode {
            BindingMode::Controlled => Self::Controlled(ControlledState::new(values)),
            BindingMode::Uncontrolled => Self::Uncontrolled(Registry::new(values)),
        }
    }

    /// Returns this store's mode.
    pub const fn mode(&self) -> BindingMode {
        match self {
            Self::Controlled(_) => BindingMode::Controlled,
            Self::Uncontrolled(_) => BindingMode::Uncontrolled,
        }
    }

    /// Returns the controlled revision, or 0 for uncontrolled stores.
    pub const fn revision(&self) -> u64 {
        match self {
            Self::Controlled(state) => state.revision(),
            Self::Uncontrolled(_) => 0,
        }
    }

    /// Overwrites one stored value, whichever mode owns it.
    ///
    /// User changes go through [`FieldBinding::set`] in controlled mode and
    /// [`Registry::write`] in uncontrolled mode; this is for rewriting a
    /// value the form itself owns.
    pub fn replace(&mut self, name: &str, value: Value) {
        match self {
            Self::Controlled(state) => {
                state.values.insert(name.to_string(), value);
                state.revision += 1;
            }
            Self::Uncontrolled(registry) => registry.write(name, value),
        }
    }

    /// Reads one value.
    pub fn read(&self, name: &str) -> Value {
        match self {
            Self::Controlled(state) => state.values.get(name).cloned().unwrap_or_default(),
            Self::Uncontrolled(registry) => registry.read(name),
        }
    }

    /// Returns an owned copy of every value.
    pub fn snapshot(&self) -> FormData {
        match self {
            Self::Controlled(state) => state.values.clone(),
            Self::Uncontrolled(registry) => registry.values.clone(),
        }
    }

    /// Replaces every value with `values`, keeping the mode.
    pub fn reset(&mut self, values: FormData) {
        match self {
            Self::Controlled(state) => {
                state.values = values;
                state.revision += 1;
            }
            Self::Uncontrolled(registry) => registry.values = values,
        }
    }
}

struct ControlledBinding<'a> {
    name: String,
    kind: FieldKind,
    state: &'a mut ControlledState,
}

impl FieldBinding for ControlledBinding<'_> {
    fn mode(&self) -> BindingMode {
        BindingMode::Controlled
    }

    fn get(&self) -> Value {
        let value = self.state.values.get(&self.name).cloned().unwrap_or_default();
        normalize(&self.kind, value)
    }

    fn set(&mut self, value: Value) {
        let value = normalize(&self.kind, value);
        self.state.values.insert(self.name.clone(), value);
        self.state.revision += 1;
    }

    fn register_native(&self) -> Option<NativeRegistration> {
        None
    }
}

struct UncontrolledBinding<'a> {
    name: String,
    kind: FieldKind,
    registry: &'a Registry,
}

impl FieldBinding for UncontrolledBinding<'_> {
    fn mode(&self) -> BindingMode {
        BindingMode::Uncontrolled
    }

    fn get(&self) -> Value {
        normalize(&self.kind, self.registry.read(&self.name))
    }

    fn set(&mut self, _value: Value) {}

    fn register_native(&self) -> Option<NativeRegistration> {
        Some(NativeRegistration {
            name: self.name.clone(),
            value: self.get(),
        })
    }
}

/// Resolves the binding adapter for one field.
///
/// In uncontrolled mode the field's control is registered as a side effect.
pub fn resolve_binding<'a>(
    field: &FieldDescriptor,
    store: &'a mut BindingStore,
) -> Box<dyn FieldBinding + 'a> {
    match store {
        BindingStore::Controlled(state) => Box::new(ControlledBinding {
            name: field.name.clone(),
            kind: field.kind.clone(),
            state,
        }),
        BindingStore::Uncontrolled(registry) => {
            registry.register(&field.name);
            Box::new(UncontrolledBinding {
                name: field.name.clone(),
                kind: field.kind.clone(),
                registry: &*registry,
            })
        }
    }
}
