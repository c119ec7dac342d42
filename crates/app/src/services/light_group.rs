//! Light group controller — aggregate query and best-effort fan-out over a
//! [`LightBridge`].
//!
//! Group members are resolved by name against the bridge on every call, so a
//! light renamed or added on the hub is picked up without a restart.

use porchlight_domain::error::{CommandError, DeviceError};
use porchlight_domain::light::{LightGroup, LightInfo, LightName};

use crate::ports::LightBridge;

/// Outcome counts of one [`LightGroupController::set_all`] call.
///
/// Returned for observability only; no control flow depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Lights that accepted the command.
    pub succeeded: usize,
    /// Lights that rejected the command or could not be reached.
    pub failed: usize,
    /// Group names the bridge does not know.
    pub missing: usize,
}

impl FanOutReport {
    /// Whether every configured light was found and accepted the command.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.missing == 0
    }
}

/// Group members as currently known to the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMembers {
    /// Bridge lights whose name is in the group. Several lights may share a
    /// name.
    pub present: Vec<LightInfo>,
    /// Group names the bridge does not know.
    pub missing: Vec<LightName>,
}

/// Application service that drives a [`LightGroup`] through a bridge.
pub struct LightGroupController<B> {
    bridge: B,
}

impl<B: LightBridge> LightGroupController<B> {
    /// Create a new controller backed by the given bridge.
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// Access the underlying bridge.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Whether at least one light of `group` currently reports on.
    ///
    /// Stops at the first light found on.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the bridge cannot list its lights or
    /// cannot report the state of a member light.
    pub async fn query_any_on(&self, group: &LightGroup) -> Result<bool, DeviceError> {
        let members = self.members(group).await?;
        for light in &members.present {
            if self.bridge.is_on(&light.id).await? {
                tracing::debug!(light = %light.name, "light reports on");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Command every light of `group` on or off.
    ///
    /// Best effort: a light that fails is logged and counted, and the
    /// remaining lights are still commanded. Nothing is retried.
    pub async fn set_all(&self, group: &LightGroup, on: bool) -> FanOutReport {
        let members = match self.members(group).await {
            Ok(members) => members,
            Err(err) => {
                tracing::warn!(%err, on, "cannot list lights, no command sent");
                return FanOutReport {
                    failed: group.len(),
                    ..FanOutReport::default()
                };
            }
        };

        let mut report = FanOutReport {
            missing: members.missing.len(),
            ..FanOutReport::default()
        };

        for light in members.present {
            match self.bridge.set_on(&light.id, on).await {
                Ok(()) => report.succeeded += 1,
                Err(source) => {
                    let err = CommandError {
                        light: light.name,
                        source,
                    };
                    tracing::warn!(%err, cause = %err.source, on, "light command failed");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Resolve `group` against the lights the bridge currently knows.
    ///
    /// Each name the bridge does not know is logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the bridge cannot list its lights.
    pub async fn members(&self, group: &LightGroup) -> Result<GroupMembers, DeviceError> {
        let present: Vec<LightInfo> = self
            .bridge
            .lights()
            .await?
            .into_iter()
            .filter(|light| group.contains(&light.name))
            .collect();

        let missing: Vec<LightName> = group
            .iter()
            .filter(|name| !present.iter().any(|light| &light.name == *name))
            .cloned()
            .collect();
        for name in &missing {
            tracing::warn!(light = %name, "configured light not found on bridge");
        }

        Ok(GroupMembers { present, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porchlight_domain::light::{LightId, LightName};
    use std::collections::{BTreeMap, BTreeSet};
    use std::future::Future;
    use std::sync::Mutex;

    // ── In-memory bridge ───────────────────────────────────────────

    #[derive(Default)]
    struct InMemoryBridge {
        lights: Mutex<BTreeMap<LightId, (LightName, bool)>>,
        broken: BTreeSet<LightId>,
        unreadable: BTreeSet<LightId>,
        unreachable: bool,
        queries: Mutex<usize>,
    }

    impl InMemoryBridge {
        fn with(lights: &[(&str, &str, bool)]) -> Self {
            let map = lights
                .iter()
                .map(|(id, name, on)| (LightId::new(*id), (LightName::new(name).unwrap(), *on)))
                .collect();
            Self {
                lights: Mutex::new(map),
                ..Self::default()
            }
        }

        fn state(&self, id: &str) -> bool {
            self.lights.lock().unwrap()[&LightId::new(id)].1
        }
    }

    fn unreachable() -> DeviceError {
        DeviceError::Unreachable(Box::new(std::io::Error::other("no route to host")))
    }

    impl LightBridge for InMemoryBridge {
        fn lights(&self) -> impl Future<Output = Result<Vec<LightInfo>, DeviceError>> + Send {
            let result = if self.unreachable {
                Err(unreachable())
            } else {
                Ok(self
                    .lights
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|(id, (name, _))| LightInfo {
                        id: id.clone(),
                        name: name.clone(),
                    })
                    .collect())
            };
            async { result }
        }

        fn is_on(&self, id: &LightId) -> impl Future<Output = Result<bool, DeviceError>> + Send {
            *self.queries.lock().unwrap() += 1;
            let result = if self.unreadable.contains(id) {
                Err(unreachable())
            } else {
                Ok(self.lights.lock().unwrap()[id].1)
            };
            async { result }
        }

        fn set_on(
            &self,
            id: &LightId,
            on: bool,
        ) -> impl Future<Output = Result<(), DeviceError>> + Send {
            let result = if self.broken.contains(id) {
                Err(DeviceError::Rejected {
                    kind: 201,
                    description: "device is off".to_string(),
                })
            } else {
                if let Some(light) = self.lights.lock().unwrap().get_mut(id) {
                    light.1 = on;
                }
                Ok(())
            };
            async { result }
        }
    }

    fn group(list: &str) -> LightGroup {
        LightGroup::parse_list(list).unwrap()
    }

    // ── query_any_on ───────────────────────────────────────────────

    #[tokio::test]
    async fn should_report_off_when_every_member_is_off() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", false),
            ("2", "Driveway", false),
        ]));
        assert!(!controller.query_any_on(&group("Porch,Driveway")).await.unwrap());
    }

    #[tokio::test]
    async fn should_report_on_when_one_member_is_on() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", false),
            ("2", "Driveway", true),
        ]));
        assert!(controller.query_any_on(&group("Porch,Driveway")).await.unwrap());
    }

    #[tokio::test]
    async fn should_ignore_lights_outside_the_group() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", false),
            ("2", "Kitchen", true),
        ]));
        assert!(!controller.query_any_on(&group("Porch")).await.unwrap());
    }

    #[tokio::test]
    async fn should_stop_querying_at_first_light_on() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", true),
            ("2", "Driveway", false),
            ("3", "Garden", false),
        ]));
        assert!(controller
            .query_any_on(&group("Porch,Driveway,Garden"))
            .await
            .unwrap());
        assert_eq!(*controller.bridge().queries.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn should_fail_query_when_bridge_unreachable() {
        let bridge = InMemoryBridge {
            unreachable: true,
            ..InMemoryBridge::default()
        };
        let controller = LightGroupController::new(bridge);
        let result = controller.query_any_on(&group("Porch")).await;
        assert!(matches!(result, Err(DeviceError::Unreachable(_))));
    }

    #[tokio::test]
    async fn should_fail_query_when_a_light_cannot_report_state() {
        let mut bridge = InMemoryBridge::with(&[("1", "Porch", false), ("2", "Driveway", false)]);
        bridge.unreadable.insert(LightId::new("2"));
        let controller = LightGroupController::new(bridge);

        let result = controller.query_any_on(&group("Porch,Driveway")).await;
        assert!(matches!(result, Err(DeviceError::Unreachable(_))));
        assert_eq!(*controller.bridge().queries.lock().unwrap(), 2);
    }

    // ── members ────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_split_group_into_present_and_missing() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", false),
            ("2", "Kitchen", false),
        ]));
        let members = controller.members(&group("Porch,Shed")).await.unwrap();
        assert_eq!(members.present.len(), 1);
        assert_eq!(members.present[0].id, LightId::new("1"));
        assert_eq!(members.missing, vec![LightName::new("Shed").unwrap()]);
    }

    #[tokio::test]
    async fn should_resolve_through_a_borrowed_bridge() {
        let bridge = InMemoryBridge::with(&[("1", "Porch", true)]);
        let controller = LightGroupController::new(&bridge);
        let members = controller.members(&group("Porch")).await.unwrap();
        assert!(members.missing.is_empty());
        assert!(controller.query_any_on(&group("Porch")).await.unwrap());
    }

    // ── set_all ────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_switch_every_member() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", false),
            ("2", "Driveway", false),
            ("3", "Kitchen", false),
        ]));
        let report = controller.set_all(&group("Porch,Driveway"), true).await;

        assert_eq!(
            report,
            FanOutReport {
                succeeded: 2,
                failed: 0,
                missing: 0
            }
        );
        assert!(report.is_complete());
        assert!(controller.bridge().state("1"));
        assert!(controller.bridge().state("2"));
        assert!(!controller.bridge().state("3"));
    }

    #[tokio::test]
    async fn should_continue_fan_out_after_a_light_fails() {
        let mut bridge = InMemoryBridge::with(&[
            ("1", "Driveway", false),
            ("2", "Garden", false),
            ("3", "Porch", false),
        ]);
        bridge.broken.insert(LightId::new("2"));
        let controller = LightGroupController::new(bridge);

        let report = controller
            .set_all(&group("Driveway,Garden,Porch"), true)
            .await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.is_complete());
        assert!(controller.bridge().state("1"));
        assert!(!controller.bridge().state("2"));
        assert!(controller.bridge().state("3"));
    }

    #[tokio::test]
    async fn should_count_names_unknown_to_the_bridge() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[("1", "Porch", false)]));
        let report = controller.set_all(&group("Porch,Shed"), true).await;
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.missing, 1);
    }

    #[tokio::test]
    async fn should_count_every_member_failed_when_bridge_unreachable() {
        let bridge = InMemoryBridge {
            unreachable: true,
            ..InMemoryBridge::default()
        };
        let controller = LightGroupController::new(bridge);
        let report = controller.set_all(&group("Porch,Driveway"), false).await;
        assert_eq!(
            report,
            FanOutReport {
                succeeded: 0,
                failed: 2,
                missing: 0
            }
        );
    }

    #[tokio::test]
    async fn should_command_every_light_sharing_a_member_name() {
        let controller = LightGroupController::new(InMemoryBridge::with(&[
            ("1", "Porch", false),
            ("2", "Porch", false),
        ]));
        let report = controller.set_all(&group("Porch"), true).await;
        assert_eq!(report.succeeded, 2);
        assert!(controller.bridge().state("1") && controller.bridge().state("2"));
    }
}
