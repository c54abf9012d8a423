//! Application state store
//!
//! One authoritative state cell holding the portfolio record and settings,
//! mutated only through a closed set of actions reduced by a pure function.
//! Side effects (persistence) are layered on top as change subscribers
//! registered once at startup; the reducer itself never touches the disk.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::storage;
use crate::model::{
    Achievement, AppSettings, Education, Experience, PersonalInfoPatch, PortfolioRecord,
    PreviewMode, Project, Skill, TemplateKind, Theme,
};
use crate::persistence::SnapshotStore;

/// Complete application state; also the persisted snapshot shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub portfolio_data: PortfolioRecord,
    pub settings: AppSettings,
}

/// The closed set of named mutations
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Shallow-merge partial personal info fields
    UpdatePersonalInfo(PersonalInfoPatch),
    /// Forms compute the whole new sequence and submit it wholesale
    ReplaceSkills(Vec<Skill>),
    ReplaceExperience(Vec<Experience>),
    ReplaceProjects(Vec<Project>),
    ReplaceEducation(Vec<Education>),
    ReplaceAchievements(Vec<Achievement>),
    /// No bounds clamping: out-of-range steps are accepted and simply
    /// resolve to no form
    SetCurrentStep(usize),
    SetTemplate(TemplateKind),
    SetTheme(Theme),
    SetPreviewMode(PreviewMode),
    /// Replace the full state, used to hydrate from persistence
    LoadSnapshot(AppState),
    /// Reset to the documented empty defaults
    ClearAll,
}

/// Pure state transition: same prior state and action always yield an
/// equal new state, and the prior state is left untouched.
pub fn reduce(prior: &AppState, action: Action) -> AppState {
    let mut state = prior.clone();
    match action {
        Action::UpdatePersonalInfo(patch) => {
            state.portfolio_data.personal_info = state.portfolio_data.personal_info.merged(patch);
        }
        Action::ReplaceSkills(skills) => state.portfolio_data.skills = skills,
        Action::ReplaceExperience(experience) => state.portfolio_data.experience = experience,
        Action::ReplaceProjects(projects) => state.portfolio_data.projects = projects,
        Action::ReplaceEducation(education) => state.portfolio_data.education = education,
        Action::ReplaceAchievements(achievements) => {
            state.portfolio_data.achievements = achievements
        }
        Action::SetCurrentStep(step) => state.settings.current_step = step,
        Action::SetTemplate(template) => state.settings.selected_template = template,
        Action::SetTheme(theme) => state.settings.theme = theme,
        Action::SetPreviewMode(mode) => state.settings.preview_mode = mode,
        Action::LoadSnapshot(snapshot) => state = snapshot,
        Action::ClearAll => state = AppState::default(),
    }
    state
}

type Subscriber = Box<dyn FnMut(&AppState)>;

/// Explicit context object owning the single state cell for the process
/// lifetime. All consumers receive it at construction; there is no
/// module-level singleton.
pub struct Store {
    state: AppState,
    subscribers: Vec<Subscriber>,
    storage: SnapshotStore,
}

impl Store {
    /// Hydrate from the persisted snapshot, or start at defaults when
    /// nothing usable is stored. Registers the auto-persist subscriber.
    pub fn init(storage: SnapshotStore) -> Self {
        let state = match storage.load::<AppState>(storage::SNAPSHOT_KEY) {
            Some(snapshot) => {
                info!("Hydrated state from persisted snapshot");
                reduce(&AppState::default(), Action::LoadSnapshot(snapshot))
            }
            None => {
                info!("No persisted snapshot, starting with defaults");
                AppState::default()
            }
        };

        let mut store = Self {
            state,
            subscribers: Vec::new(),
            storage: storage.clone(),
        };
        store.subscribe(Box::new(move |state: &AppState| {
            // Only persist once the user has actually entered a name;
            // saves are best-effort and never block the transition.
            if !state.portfolio_data.personal_info.full_name.is_empty() {
                storage.save(storage::SNAPSHOT_KEY, state);
            }
        }));
        store
    }

    /// Store without hydration or persistence, for tests and headless use
    pub fn with_state(state: AppState, storage: SnapshotStore) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            storage,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Register a change listener; called with each new state value
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Apply an action and notify subscribers with the new state
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
    }

    /// Reset to empty defaults and delete the persisted snapshot.
    /// Callers must have confirmed this with the user first.
    pub fn clear_all(&mut self) {
        info!("Clearing all portfolio data");
        self.dispatch(Action::ClearAll);
        self.storage.remove(storage::SNAPSHOT_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SkillLevel;

    fn named_state(name: &str) -> AppState {
        let mut state = AppState::default();
        state.portfolio_data.personal_info.full_name = name.to_string();
        state
    }

    #[test]
    fn test_reduce_is_pure_and_leaves_prior_untouched() {
        let prior = named_state("Alan Turing");
        let before = prior.clone();

        let action = Action::ReplaceSkills(vec![Skill::new("Cryptanalysis", SkillLevel::Expert)]);
        let a = reduce(&prior, action.clone());
        let b = reduce(&prior, action);

        assert_eq!(a, b);
        assert_eq!(prior, before);
        assert_ne!(a, prior);
    }

    #[test]
    fn test_update_personal_info_merges() {
        let prior = named_state("Alan Turing");
        let next = reduce(
            &prior,
            Action::UpdatePersonalInfo(PersonalInfoPatch {
                title: Some("Mathematician".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(next.portfolio_data.personal_info.full_name, "Alan Turing");
        assert_eq!(next.portfolio_data.personal_info.title, "Mathematician");
    }

    #[test]
    fn test_replace_sequence_is_wholesale() {
        let prior = reduce(
            &AppState::default(),
            Action::ReplaceSkills(vec![
                Skill::new("Rust", SkillLevel::Advanced),
                Skill::new("C", SkillLevel::Intermediate),
            ]),
        );

        let replacement = vec![Skill::new("Zig", SkillLevel::Beginner)];
        let next = reduce(&prior, Action::ReplaceSkills(replacement.clone()));
        assert_eq!(next.portfolio_data.skills, replacement);
    }

    #[test]
    fn test_set_current_step_not_clamped() {
        let next = reduce(&AppState::default(), Action::SetCurrentStep(99));
        assert_eq!(next.settings.current_step, 99);
    }

    #[test]
    fn test_load_snapshot_replaces_everything() {
        let prior = reduce(&AppState::default(), Action::SetCurrentStep(3));
        let snapshot = named_state("Margaret Hamilton");
        let next = reduce(&prior, Action::LoadSnapshot(snapshot.clone()));
        assert_eq!(next, snapshot);
    }

    #[test]
    fn test_clear_all_resets_to_documented_defaults() {
        let mut prior = named_state("Alan Turing");
        prior.settings.theme = Theme::Dark;
        prior.settings.current_step = 4;
        prior.portfolio_data.skills.push(Skill::new("Logic", SkillLevel::Expert));

        let next = reduce(&prior, Action::ClearAll);
        assert_eq!(next, AppState::default());
    }

    #[test]
    fn test_store_hydrates_from_persisted_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SnapshotStore::with_dir(dir.path());
        storage.save(storage::SNAPSHOT_KEY, &named_state("Saved Person"));

        let store = Store::init(SnapshotStore::with_dir(dir.path()));
        assert_eq!(
            store.state().portfolio_data.personal_info.full_name,
            "Saved Person"
        );
    }

    #[test]
    fn test_store_defaults_when_snapshot_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(format!("{}.json", storage::SNAPSHOT_KEY)),
            "{\"portfolioData\": 12}",
        )
        .unwrap();

        let store = Store::init(SnapshotStore::with_dir(dir.path()));
        assert_eq!(store.state(), &AppState::default());
    }

    #[test]
    fn test_dispatch_persists_once_named() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::init(SnapshotStore::with_dir(dir.path()));

        // Nameless states are not persisted
        store.dispatch(Action::SetTheme(Theme::Dark));
        let storage = SnapshotStore::with_dir(dir.path());
        assert!(storage.load::<AppState>(storage::SNAPSHOT_KEY).is_none());

        store.dispatch(Action::UpdatePersonalInfo(PersonalInfoPatch {
            full_name: Some("Hedy Lamarr".to_string()),
            ..Default::default()
        }));
        let persisted: AppState = storage.load(storage::SNAPSHOT_KEY).unwrap();
        assert_eq!(persisted, *store.state());
        assert_eq!(persisted.settings.theme, Theme::Dark);
    }

    #[test]
    fn test_clear_all_removes_persisted_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::init(SnapshotStore::with_dir(dir.path()));
        store.dispatch(Action::UpdatePersonalInfo(PersonalInfoPatch {
            full_name: Some("Hedy Lamarr".to_string()),
            ..Default::default()
        }));

        let storage = SnapshotStore::with_dir(dir.path());
        assert!(storage.load::<AppState>(storage::SNAPSHOT_KEY).is_some());

        store.clear_all();
        assert_eq!(store.state(), &AppState::default());
        assert!(storage.load::<AppState>(storage::SNAPSHOT_KEY).is_none());
    }

    #[test]
    fn test_subscriber_sees_each_new_state() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::init(SnapshotStore::with_dir(dir.path()));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |state: &AppState| {
            sink.borrow_mut().push(state.settings.current_step);
        }));

        store.dispatch(Action::SetCurrentStep(1));
        store.dispatch(Action::SetCurrentStep(5));
        assert_eq!(*seen.borrow(), vec![1, 5]);
    }
}
