//! Background task registry
//!
//! One entry per outstanding media-generation request. Tasks for different
//! slots are independent and run concurrently. For the *same* slot, every
//! new request bumps a per-slot generation counter; a completion carrying a
//! stale generation is discarded before it touches the document or the
//! store, so the latest request wins regardless of completion order.

use std::collections::HashMap;

use site_types::{BackgroundTask, TaskState, TaskTarget, IMAGES_SECTION, VIDEOS_SECTION};

/// Document section a task writes into.
pub fn section_for(target: &TaskTarget) -> &'static str {
    match target {
        TaskTarget::Image { .. } => IMAGES_SECTION,
        TaskTarget::Video { .. } => VIDEOS_SECTION,
    }
}

#[derive(Debug)]
struct TaskEntry {
    task: BackgroundTask,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    entries: HashMap<String, TaskEntry>,
    /// (section, slot) -> most recently requested generation.
    latest: HashMap<(String, String), u64>,
}

impl TaskRegistry {
    /// Track a new task, bumping its slot's generation counter.
    pub fn insert(&mut self, task: BackgroundTask) -> u64 {
        let key = (
            section_for(&task.target).to_string(),
            task.target.slot_key(),
        );
        let generation = self
            .latest
            .entry(key)
            .and_modify(|g| *g += 1)
            .or_insert(1);
        let generation = *generation;
        self.entries
            .insert(task.task_id.clone(), TaskEntry { task, generation });
        generation
    }

    pub fn get(&self, task_id: &str) -> Option<&BackgroundTask> {
        self.entries.get(task_id).map(|entry| &entry.task)
    }

    pub fn target(&self, task_id: &str) -> Option<TaskTarget> {
        self.get(task_id).map(|task| task.target.clone())
    }

    pub fn mark_generating(&mut self, task_id: &str) {
        if let Some(entry) = self.entries.get_mut(task_id) {
            if entry.task.state == TaskState::Queued {
                entry.task.state = TaskState::Generating;
            }
        }
    }

    /// Move a task to a terminal state with fresh status text.
    pub fn complete(&mut self, task_id: &str, state: TaskState, status_text: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(task_id) {
            entry.task.state = state;
            entry.task.status_text = status_text.into();
        }
    }

    /// Whether this task is still the newest request for its slot.
    pub fn is_latest(&self, task_id: &str) -> bool {
        let Some(entry) = self.entries.get(task_id) else {
            return false;
        };
        let key = (
            section_for(&entry.task.target).to_string(),
            entry.task.target.slot_key(),
        );
        self.latest.get(&key) == Some(&entry.generation)
    }

    pub fn remove(&mut self, task_id: &str) -> Option<BackgroundTask> {
        self.entries.remove(task_id).map(|entry| entry.task)
    }

    /// All tracked tasks, oldest first (for the session snapshot).
    pub fn all(&self) -> Vec<BackgroundTask> {
        let mut tasks: Vec<BackgroundTask> = self
            .entries
            .values()
            .map(|entry| entry.task.clone())
            .collect();
        tasks.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        tasks
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_types::VideoStyle;

    fn image_task(slot: &str) -> BackgroundTask {
        BackgroundTask::new(
            TaskTarget::Image {
                slot: slot.to_string(),
            },
            format!("Generating {slot} image..."),
        )
    }

    #[test]
    fn same_slot_requests_bump_generation() {
        let mut registry = TaskRegistry::default();
        let first = image_task("hero");
        let second = image_task("hero");
        let first_id = first.task_id.clone();
        let second_id = second.task_id.clone();

        assert_eq!(registry.insert(first), 1);
        assert_eq!(registry.insert(second), 2);

        assert!(!registry.is_latest(&first_id));
        assert!(registry.is_latest(&second_id));
    }

    #[test]
    fn different_slots_are_independent() {
        let mut registry = TaskRegistry::default();
        let hero = image_task("hero");
        let about = image_task("about");
        let hero_id = hero.task_id.clone();
        let about_id = about.task_id.clone();

        registry.insert(hero);
        registry.insert(about);

        assert!(registry.is_latest(&hero_id));
        assert!(registry.is_latest(&about_id));
    }

    #[test]
    fn image_and_video_slots_never_collide() {
        let mut registry = TaskRegistry::default();
        let image = image_task("promo");
        let video = BackgroundTask::new(
            TaskTarget::Video {
                style: VideoStyle::Promo,
            },
            "Generating promo video...",
        );
        let image_id = image.task_id.clone();
        let video_id = video.task_id.clone();

        registry.insert(image);
        registry.insert(video);

        assert!(registry.is_latest(&image_id));
        assert!(registry.is_latest(&video_id));
    }

    #[test]
    fn completion_updates_state_and_text() {
        let mut registry = TaskRegistry::default();
        let task = image_task("hero");
        let task_id = task.task_id.clone();
        registry.insert(task);

        registry.mark_generating(&task_id);
        assert_eq!(registry.get(&task_id).unwrap().state, TaskState::Generating);

        registry.complete(&task_id, TaskState::Done, "Hero image ready");
        let task = registry.get(&task_id).unwrap();
        assert_eq!(task.state, TaskState::Done);
        assert_eq!(task.status_text, "Hero image ready");
    }

    #[test]
    fn removed_tasks_are_never_latest() {
        let mut registry = TaskRegistry::default();
        let task = image_task("hero");
        let task_id = task.task_id.clone();
        registry.insert(task);

        assert!(registry.remove(&task_id).is_some());
        assert!(!registry.is_latest(&task_id));
        assert!(registry.is_empty());
    }
}
