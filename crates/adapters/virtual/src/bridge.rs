//! Virtual light bridge.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use porchlight_app::ports::LightBridge;
use porchlight_domain::error::DeviceError;
use porchlight_domain::light::{LightId, LightInfo, LightName};

/// One `set_on` call the bridge accepted or refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub light: LightName,
    pub on: bool,
    pub accepted: bool,
}

#[derive(Default)]
struct State {
    lights: BTreeMap<LightId, (LightName, bool)>,
    unreachable: bool,
    failing: BTreeSet<LightId>,
    commands: Vec<Command>,
}

impl State {
    fn id_of(&self, name: &LightName) -> Option<LightId> {
        self.lights
            .iter()
            .find(|(_, (n, _))| n == name)
            .map(|(id, _)| id.clone())
    }
}

fn offline() -> DeviceError {
    DeviceError::Unreachable(Box::new(std::io::Error::other("virtual bridge offline")))
}

/// In-memory [`LightBridge`].
///
/// Lights get sequential ids (`"1"`, `"2"`, …) in insertion order and start
/// off.
#[derive(Default)]
pub struct VirtualBridge {
    state: Mutex<State>,
}

impl VirtualBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge that already knows `names`, all off.
    #[must_use]
    pub fn with_lights<'a>(names: impl IntoIterator<Item = &'a LightName>) -> Self {
        let bridge = Self::new();
        for name in names {
            bridge.add_light(name.clone());
        }
        bridge
    }

    /// Register a light, returning the id it was given.
    pub fn add_light(&self, name: LightName) -> LightId {
        let mut state = self.lock();
        let id = LightId::new((state.lights.len() + 1).to_string());
        state.lights.insert(id.clone(), (name, false));
        id
    }

    /// Switch a light by hand, as a person at the wall switch would.
    ///
    /// Not recorded as a command. Returns `false` if no light has that name.
    pub fn flip(&self, name: &LightName, on: bool) -> bool {
        let mut state = self.lock();
        let Some(id) = state.id_of(name) else {
            return false;
        };
        if let Some(light) = state.lights.get_mut(&id) {
            light.1 = on;
        }
        tracing::debug!(light = %name, on, "virtual light flipped by hand");
        true
    }

    /// Current state of the light called `name`.
    #[must_use]
    pub fn is_light_on(&self, name: &LightName) -> Option<bool> {
        let state = self.lock();
        let id = state.id_of(name)?;
        state.lights.get(&id).map(|(_, on)| *on)
    }

    /// Make every call fail as if the bridge were off the network.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Make commands to one light fail. Returns `false` if no light has that name.
    pub fn set_failing(&self, name: &LightName, failing: bool) -> bool {
        let mut state = self.lock();
        let Some(id) = state.id_of(name) else {
            return false;
        };
        if failing {
            state.failing.insert(id);
        } else {
            state.failing.remove(&id);
        }
        true
    }

    /// Every command received so far, oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.lock().commands.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LightBridge for VirtualBridge {
    async fn lights(&self) -> Result<Vec<LightInfo>, DeviceError> {
        let state = self.lock();
        if state.unreachable {
            return Err(offline());
        }
        Ok(state
            .lights
            .iter()
            .map(|(id, (name, _))| LightInfo {
                id: id.clone(),
                name: name.clone(),
            })
            .collect())
    }

    async fn is_on(&self, id: &LightId) -> Result<bool, DeviceError> {
        let state = self.lock();
        if state.unreachable {
            return Err(offline());
        }
        state
            .lights
            .get(id)
            .map(|(_, on)| *on)
            .ok_or_else(|| DeviceError::Rejected {
                kind: 3,
                description: format!("light {id} not available"),
            })
    }

    async fn set_on(&self, id: &LightId, on: bool) -> Result<(), DeviceError> {
        let mut state = self.lock();
        if state.unreachable {
            return Err(offline());
        }
        let accepted = !state.failing.contains(id);
        let Some(light) = state.lights.get_mut(id) else {
            return Err(DeviceError::Rejected {
                kind: 3,
                description: format!("light {id} not available"),
            });
        };
        if accepted {
            light.1 = on;
        }
        let name = light.0.clone();
        tracing::info!(light = %name, on, accepted, "virtual light commanded");
        state.commands.push(Command {
            light: name,
            on,
            accepted,
        });

        if accepted {
            Ok(())
        } else {
            Err(DeviceError::Rejected {
                kind: 201,
                description: "device is set to off".to_string(),
            })
        }
    }
}
