//! Which physical key is the primary shortcut modifier.

use std::cell::Cell;
use std::rc::Rc;

/// Answers "is this a Mac-like platform" (Command is primary) per keydown. Implementations
/// may change their answer between calls; callers must not cache it.
pub trait Platform {
    fn is_primary_modifier_platform(&self) -> bool;
}

impl<T: Platform + ?Sized> Platform for &T {
    fn is_primary_modifier_platform(&self) -> bool {
        (**self).is_primary_modifier_platform()
    }
}

/// The platform this binary was compiled for.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl Platform for HostPlatform {
    fn is_primary_modifier_platform(&self) -> bool {
        cfg!(target_os = "macos") || cfg!(target_os = "ios")
    }
}

/// Explicit answer; clones share the flag so tests can flip it mid-session.
#[derive(Debug, Clone, Default)]
pub struct FixedPlatform {
    command_is_primary: Rc<Cell<bool>>,
}

impl FixedPlatform {
    pub fn control() -> Self {
        Self::new(false)
    }

    pub fn command() -> Self {
        Self::new(true)
    }

    pub fn new(command_is_primary: bool) -> Self {
        Self {
            command_is_primary: Rc::new(Cell::new(command_is_primary)),
        }
    }

    pub fn set_command_is_primary(&self, value: bool) {
        self.command_is_primary.set(value);
    }
}

impl Platform for FixedPlatform {
    fn is_primary_modifier_platform(&self) -> bool {
        self.command_is_primary.get()
    }
}
