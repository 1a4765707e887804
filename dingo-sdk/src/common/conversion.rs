//! Mapping between domain entities and wire messages

use super::cluster::{Executor, ExecutorState, ExecutorUser, Location};
use crate::error::{Result, SdkError};
use crate::protocol as pb;

impl From<ExecutorState> for pb::ExecutorState {
    fn from(state: ExecutorState) -> Self {
        match state {
            ExecutorState::New => pb::ExecutorState::ExecutorNew,
            ExecutorState::Normal => pb::ExecutorState::ExecutorNormal,
            ExecutorState::Offline => pb::ExecutorState::ExecutorOffline,
        }
    }
}

impl From<pb::ExecutorState> for ExecutorState {
    fn from(state: pb::ExecutorState) -> Self {
        match state {
            pb::ExecutorState::ExecutorNew => ExecutorState::New,
            pb::ExecutorState::ExecutorNormal => ExecutorState::Normal,
            pb::ExecutorState::ExecutorOffline => ExecutorState::Offline,
        }
    }
}

impl From<&Location> for pb::Location {
    fn from(location: &Location) -> Self {
        pb::Location {
            host: location.host.clone(),
            port: i32::from(location.port),
        }
    }
}

impl TryFrom<pb::Location> for Location {
    type Error = SdkError;

    fn try_from(location: pb::Location) -> Result<Self> {
        let port = u16::try_from(location.port).map_err(|_| SdkError::InvalidMessage {
            reason: format!("port {} out of range for {}", location.port, location.host),
        })?;
        Ok(Location {
            host: location.host,
            port,
        })
    }
}

impl From<&ExecutorUser> for pb::ExecutorUser {
    fn from(user: &ExecutorUser) -> Self {
        pb::ExecutorUser {
            user: user.user.clone(),
            keyring: user.keyring.clone(),
        }
    }
}

impl From<pb::ExecutorUser> for ExecutorUser {
    fn from(user: pb::ExecutorUser) -> Self {
        ExecutorUser {
            user: user.user,
            keyring: user.keyring,
        }
    }
}

impl From<&Executor> for pb::Executor {
    fn from(executor: &Executor) -> Self {
        pb::Executor {
            id: executor.id.clone(),
            server_location: Some((&executor.server_location).into()),
            executor_user: Some((&executor.executor_user).into()),
            state: pb::ExecutorState::from(executor.state) as i32,
            create_timestamp: executor.create_timestamp,
            last_seen_timestamp: executor.last_seen_timestamp,
            cluster_name: executor.cluster_name.clone(),
        }
    }
}

impl TryFrom<pb::Executor> for Executor {
    type Error = SdkError;

    fn try_from(executor: pb::Executor) -> Result<Self> {
        let state = ExecutorState::from(executor.state());
        let server_location: Location = executor
            .server_location
            .ok_or_else(|| SdkError::InvalidMessage {
                reason: format!("executor {} has no server location", executor.id),
            })?
            .try_into()?;

        Ok(Executor {
            id: executor.id,
            server_location,
            executor_user: executor.executor_user.map(Into::into).unwrap_or_default(),
            state,
            cluster_name: executor.cluster_name,
            create_timestamp: executor.create_timestamp,
            last_seen_timestamp: executor.last_seen_timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_executor(id: &str, port: i32) -> pb::Executor {
        pb::Executor {
            id: id.into(),
            server_location: Some(pb::Location {
                host: "10.0.0.5".into(),
                port,
            }),
            executor_user: Some(pb::ExecutorUser {
                user: "root".into(),
                keyring: "secret".into(),
            }),
            state: pb::ExecutorState::ExecutorNormal as i32,
            create_timestamp: 1_700_000_000_000,
            last_seen_timestamp: 1_700_000_005_000,
            cluster_name: "dingo".into(),
        }
    }

    #[test]
    fn test_outgoing_mapping_keeps_fields() {
        let executor = Executor::new(
            "exec-1",
            Location::new("127.0.0.1", 8765),
            ExecutorUser::new("root", "secret"),
        )
        .with_cluster_name("dingo");

        let wire = pb::Executor::from(&executor);
        assert_eq!(wire.id, "exec-1");
        assert_eq!(wire.state(), pb::ExecutorState::ExecutorNew);
        assert_eq!(wire.server_location.unwrap().port, 8765);
        assert_eq!(wire.executor_user.unwrap().keyring, "secret");
        assert_eq!(wire.cluster_name, "dingo");
    }

    #[test]
    fn test_incoming_mapping() {
        let executor = Executor::try_from(wire_executor("exec-2", 9000)).unwrap();
        assert!(executor.is_normal());
        assert_eq!(executor.server_location.to_string(), "10.0.0.5:9000");
        assert_eq!(executor.executor_user.user, "root");
        assert_eq!(executor.last_seen_timestamp, 1_700_000_005_000);
    }

    #[test]
    fn test_incoming_rejects_bad_port() {
        let err = Executor::try_from(wire_executor("exec-3", 70_000)).unwrap_err();
        assert!(matches!(err, SdkError::InvalidMessage { .. }));
    }

    #[test]
    fn test_incoming_requires_location() {
        let mut wire = wire_executor("exec-4", 9000);
        wire.server_location = None;
        assert!(Executor::try_from(wire).is_err());
    }

    #[test]
    fn test_missing_user_defaults_to_empty() {
        let mut wire = wire_executor("exec-5", 9000);
        wire.executor_user = None;
        let executor = Executor::try_from(wire).unwrap();
        assert_eq!(executor.executor_user, ExecutorUser::default());
    }
}
