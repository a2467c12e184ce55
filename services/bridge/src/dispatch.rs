//! Routes decoded hook messages to the decoration hub or the allocator.

use bridge_handoff::DecorationHub;
use bridge_proto::{AddSlave, Environment, Labels};
use prost::Message;
use thiserror::Error;
use tracing::{debug, info};

use crate::allocator::AllocatorGateway;
use crate::multipart::HookMessage;

/// What a dispatched message turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    MasterLaunchTaskLabels,
    SlaveRunTaskLabels,
    SlaveExecutorEnvironment,
    SlaveAdded,
    /// Unknown kind tag; deliberately a silent no-op at this layer.
    Ignored,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The opaque payload did not decode as the schema its kind implies.
    /// Nothing is posted and the allocator is not called.
    #[error("failed to decode `{kind}` payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: prost::DecodeError,
    },
}

/// Map a message's kind tag to its action.
///
/// Decorator kinds post into the matching mailbox; `AddSlave` goes to the
/// allocator gateway; anything else is ignored. A payload that fails to
/// decode rejects the whole message with no side effects.
pub fn dispatch(
    message: HookMessage,
    hub: &DecorationHub,
    gateway: &AllocatorGateway,
) -> Result<Dispatch, DispatchError> {
    match message.kind.as_str() {
        "MasterLaunchTaskLabelDecorator" => {
            let labels = decode::<Labels>(&message)?;
            hub.master_launch_task_labels().post(labels);
            info!("posted master launch task labels");
            Ok(Dispatch::MasterLaunchTaskLabels)
        }
        "SlaveRunTaskLabelDecorator" => {
            let labels = decode::<Labels>(&message)?;
            hub.slave_run_task_labels().post(labels);
            info!("posted slave run task labels");
            Ok(Dispatch::SlaveRunTaskLabels)
        }
        "SlaveExecutorEnvironmentDecorator" => {
            let environment = decode::<Environment>(&message)?;
            hub.slave_executor_environment().post(environment);
            info!("posted slave executor environment");
            Ok(Dispatch::SlaveExecutorEnvironment)
        }
        "AddSlave" => {
            let snapshot = decode::<AddSlave>(&message)?;
            gateway.add_slave(snapshot);
            Ok(Dispatch::SlaveAdded)
        }
        other => {
            debug!(kind = other, "ignoring hook message with unknown kind");
            Ok(Dispatch::Ignored)
        }
    }
}

fn decode<M: Message + Default>(message: &HookMessage) -> Result<M, DispatchError> {
    M::decode(message.payload.as_ref()).map_err(|source| DispatchError::Payload {
        kind: message.kind.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bridge_proto::Label;
    use bytes::Bytes;

    use crate::allocator::{Allocator, RecordingAllocator};

    struct Fixture {
        hub: DecorationHub,
        gateway: AllocatorGateway,
        allocator: Arc<RecordingAllocator>,
    }

    fn fixture() -> Fixture {
        let allocator = Arc::new(RecordingAllocator::new());
        Fixture {
            hub: DecorationHub::new(),
            gateway: AllocatorGateway::new(Arc::clone(&allocator) as Arc<dyn Allocator>),
            allocator,
        }
    }

    fn message(kind: &str, payload: Vec<u8>) -> HookMessage {
        HookMessage {
            kind: kind.to_string(),
            payload: Bytes::from(payload),
        }
    }

    #[test]
    fn decorator_message_lands_in_its_own_mailbox() {
        let f = fixture();
        let labels = Labels {
            labels: vec![Label {
                key: "env".to_string(),
                value: Some("prod".to_string()),
            }],
        };

        let outcome = dispatch(
            message("MasterLaunchTaskLabelDecorator", labels.encode_to_vec()),
            &f.hub,
            &f.gateway,
        )
        .unwrap();

        assert_eq!(outcome, Dispatch::MasterLaunchTaskLabels);
        assert_eq!(f.hub.master_launch_task_labels().try_take(), Some(labels));
        assert_eq!(f.hub.slave_run_task_labels().try_take(), None);
        assert!(f.allocator.calls().is_empty());
    }

    #[test]
    fn add_slave_message_reaches_the_allocator() {
        let f = fixture();
        let snapshot = AddSlave {
            slave_id: Some(bridge_proto::SlaveId {
                value: "s1".to_string(),
            }),
            ..Default::default()
        };

        let outcome = dispatch(
            message("AddSlave", snapshot.encode_to_vec()),
            &f.hub,
            &f.gateway,
        )
        .unwrap();

        assert_eq!(outcome, Dispatch::SlaveAdded);
        assert_eq!(f.allocator.calls().len(), 1);
        assert_eq!(f.allocator.calls()[0].slave_id.value, "s1");
    }

    #[test]
    fn unknown_kind_touches_nothing() {
        let f = fixture();

        let outcome = dispatch(message("DrainSlave", vec![1, 2, 3]), &f.hub, &f.gateway).unwrap();

        assert_eq!(outcome, Dispatch::Ignored);
        assert_eq!(f.hub.master_launch_task_labels().try_take(), None);
        assert_eq!(f.hub.slave_run_task_labels().try_take(), None);
        assert_eq!(f.hub.slave_executor_environment().try_take(), None);
        assert!(f.allocator.calls().is_empty());
    }

    #[test]
    fn undecodable_payload_is_rejected_without_side_effects() {
        let f = fixture();
        // 0xff is never a valid field key byte.
        let result = dispatch(
            message("SlaveExecutorEnvironmentDecorator", vec![0xff, 0xff]),
            &f.hub,
            &f.gateway,
        );

        assert!(matches!(result, Err(DispatchError::Payload { .. })));
        assert_eq!(f.hub.slave_executor_environment().try_take(), None);
        assert!(f.allocator.calls().is_empty());
    }
}
