//! The per-kind decoration mailboxes shared between the HTTP front end and
//! the allocator.

use bridge_proto::{Environment, Labels};

use crate::Mailbox;

/// One mailbox per decoration kind.
///
/// The kinds are fully independent: posting slave-run labels wakes only
/// threads waiting for slave-run labels. The hub lives for the whole
/// process and is shared by `Arc`; the HTTP request router posts into it,
/// allocator worker threads block on the `wait_for_*` methods.
pub struct DecorationHub {
    master_launch_task_labels: Mailbox<Labels>,
    slave_run_task_labels: Mailbox<Labels>,
    slave_executor_environment: Mailbox<Environment>,
}

impl DecorationHub {
    pub fn new() -> Self {
        Self {
            master_launch_task_labels: Mailbox::new("MasterLaunchTaskLabelDecorator"),
            slave_run_task_labels: Mailbox::new("SlaveRunTaskLabelDecorator"),
            slave_executor_environment: Mailbox::new("SlaveExecutorEnvironmentDecorator"),
        }
    }

    /// Mailbox for labels attached when the master launches a task.
    pub fn master_launch_task_labels(&self) -> &Mailbox<Labels> {
        &self.master_launch_task_labels
    }

    /// Mailbox for labels attached when a slave runs a task.
    pub fn slave_run_task_labels(&self) -> &Mailbox<Labels> {
        &self.slave_run_task_labels
    }

    /// Mailbox for the executor environment decoration.
    pub fn slave_executor_environment(&self) -> &Mailbox<Environment> {
        &self.slave_executor_environment
    }

    /// Block until the configurator supplies master launch task labels.
    pub fn wait_for_master_launch_task_labels(&self) -> Labels {
        self.master_launch_task_labels.wait()
    }

    /// Block until the configurator supplies slave run task labels.
    pub fn wait_for_slave_run_task_labels(&self) -> Labels {
        self.slave_run_task_labels.wait()
    }

    /// Block until the configurator supplies the executor environment.
    pub fn wait_for_slave_executor_environment(&self) -> Environment {
        self.slave_executor_environment.wait()
    }
}

impl Default for DecorationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use bridge_proto::{Label, Variable};

    fn labels(key: &str) -> Labels {
        Labels {
            labels: vec![Label {
                key: key.to_string(),
                value: None,
            }],
        }
    }

    fn environment(name: &str) -> Environment {
        Environment {
            variables: vec![Variable {
                name: name.to_string(),
                value: "1".to_string(),
            }],
        }
    }

    #[test]
    fn waiter_receives_the_exact_posted_value() {
        let hub = Arc::new(DecorationHub::new());

        let waiter = {
            let hub = Arc::clone(&hub);
            thread::spawn(move || hub.wait_for_slave_run_task_labels())
        };

        thread::sleep(Duration::from_millis(50));
        hub.slave_run_task_labels().post(labels("rack"));

        assert_eq!(waiter.join().unwrap(), labels("rack"));
    }

    /// Regression test for the shared-ready-flag design this hub replaces:
    /// a post for one kind must never consume the wakeup of a waiter
    /// blocked on a different kind.
    #[test]
    fn concurrent_posts_of_different_kinds_release_both_waiters() {
        let hub = Arc::new(DecorationHub::new());

        let labels_waiter = {
            let hub = Arc::clone(&hub);
            thread::spawn(move || hub.wait_for_master_launch_task_labels())
        };
        let env_waiter = {
            let hub = Arc::clone(&hub);
            thread::spawn(move || hub.wait_for_slave_executor_environment())
        };

        thread::sleep(Duration::from_millis(50));

        let post_labels = {
            let hub = Arc::clone(&hub);
            thread::spawn(move || hub.master_launch_task_labels().post(labels("tier")))
        };
        let post_env = {
            let hub = Arc::clone(&hub);
            thread::spawn(move || hub.slave_executor_environment().post(environment("PATH")))
        };
        post_labels.join().unwrap();
        post_env.join().unwrap();

        assert_eq!(labels_waiter.join().unwrap(), labels("tier"));
        assert_eq!(env_waiter.join().unwrap(), environment("PATH"));
    }

    #[test]
    fn posting_one_kind_leaves_other_kinds_empty() {
        let hub = DecorationHub::new();
        hub.master_launch_task_labels().post(labels("a"));

        assert_eq!(hub.slave_run_task_labels().try_take(), None);
        assert_eq!(hub.slave_executor_environment().try_take(), None);
        assert_eq!(hub.master_launch_task_labels().try_take(), Some(labels("a")));
    }
}
