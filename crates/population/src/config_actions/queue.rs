use bevy::prelude::*;

use super::ConfigAction;

/// Pending configuration changes, applied once per frame.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ConfigQueue {
    pending: Vec<ConfigAction>,
}

impl ConfigQueue {
    pub fn push(&mut self, action: ConfigAction) {
        self.pending.push(action);
    }

    pub fn drain(&mut self) -> Vec<ConfigAction> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = ConfigQueue::default();
        queue.push(ConfigAction::SetCustomSchools { enabled: true });
        queue.push(ConfigAction::InvalidateCaches);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(
            drained,
            vec![
                ConfigAction::SetCustomSchools { enabled: true },
                ConfigAction::InvalidateCaches
            ]
        );
    }
}
