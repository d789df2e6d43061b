//! Selection rules for the staged and working-tree collections.
//!
//! A selection spans one collection only: selecting an entry clears every selection
//! in the other collection. Without multi-select it also clears the other entries of
//! its own collection. A shift-range extends the selection over the *displayed*
//! (filtered) ordering, and is skipped when the click switched collections.
//!
//! Every mutation returns `true` when the set of selected working-tree entries
//! changed, which is when the host should re-run the diff.

use crate::core::file_change::FileChange;
use crate::core::repository::RepositoryState;
use crate::core::vcs::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    None,
    StagedOnly,
    WorkingTreeOnly,
}

/// One click on a displayed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectRequest {
    pub collection: Collection,
    pub key: String,
    /// New value of the entry's selection flag
    pub selected: bool,
    /// Keep other selections in the same collection
    pub multi_select: bool,
    /// Position of the entry in the displayed list
    pub index: usize,
    /// Anchor of a shift-range, if one is active
    pub last_index: Option<usize>,
}

impl SelectRequest {
    pub fn click(collection: Collection, key: impl Into<String>, index: usize) -> Self {
        Self {
            collection,
            key: key.into(),
            selected: true,
            multi_select: false,
            index,
            last_index: None,
        }
    }

    pub fn toggle(mut self, selected: bool) -> Self {
        self.selected = selected;
        self.multi_select = true;
        self
    }

    pub fn extend_from(mut self, last_index: usize) -> Self {
        self.last_index = Some(last_index);
        self
    }
}

impl RepositoryState {
    /// Apply one click. `visible` is the displayed key order of the request's collection.
    pub fn select(&mut self, request: &SelectRequest, visible: &[String]) -> bool {
        let before = self.working_tree_selection_keys();

        let Some(file) = self.collection_mut(request.collection).get_mut(&request.key) else {
            log::debug!("Ignoring selection of unknown entry '{}'", request.key);
            return false;
        };
        file.set_selected(request.selected);

        if request.selected {
            let other = request.collection.other();
            let switched = self.collection(other).values().any(FileChange::is_selected);
            set_all(self.collection_mut(other).values_mut(), false);

            if !request.multi_select {
                for (key, file) in self.collection_mut(request.collection).iter_mut() {
                    if *key != request.key {
                        file.set_selected(false);
                    }
                }
            }

            match request.last_index {
                Some(last) if !switched => {
                    let (start, end) = (last.min(request.index), last.max(request.index));
                    let collection = self.collection_mut(request.collection);
                    for key in visible.iter().skip(start).take(end + 1 - start) {
                        if let Some(file) = collection.get_mut(key) {
                            file.set_selected(true);
                        }
                    }
                }
                _ => {}
            }
        }

        self.revalidate_selection();
        log::debug!(
            "Selection: {} staged, {} working tree",
            self.count_selected(Collection::Staged),
            self.count_selected(Collection::WorkingTree)
        );
        before != self.working_tree_selection_keys()
    }

    /// Select every displayed entry of `collection`
    pub fn select_all(&mut self, collection: Collection, visible: &[String]) -> bool {
        let before = self.working_tree_selection_keys();

        set_all(self.collection_mut(collection.other()).values_mut(), false);
        let target = self.collection_mut(collection);
        for key in visible {
            if let Some(file) = target.get_mut(key) {
                file.set_selected(true);
            }
        }

        self.revalidate_selection();
        before != self.working_tree_selection_keys()
    }

    pub fn clear_selection(&mut self) -> bool {
        let before = self.working_tree_selection_keys();
        set_all(self.staged.values_mut(), false);
        set_all(self.working_tree.values_mut(), false);
        self.revalidate_selection();
        before != self.working_tree_selection_keys()
    }

    /// Recompute the `any_*` flags and the selection cache by scanning both collections
    pub(crate) fn revalidate_selection(&mut self) {
        let mut selection = Vec::new();
        for collection in [Collection::WorkingTree, Collection::Staged] {
            selection.extend(
                self.collection(collection)
                    .iter()
                    .filter(|(_, file)| file.is_selected())
                    .map(|(key, _)| (collection, key.clone())),
            );
        }
        self.any_staged_selected = selection.iter().any(|(c, _)| *c == Collection::Staged);
        self.any_working_tree_selected = selection.iter().any(|(c, _)| *c == Collection::WorkingTree);
        self.selection = selection;
    }

    pub fn any_staged_selected(&self) -> bool {
        self.any_staged_selected
    }

    pub fn any_working_tree_selected(&self) -> bool {
        self.any_working_tree_selected
    }

    pub fn selection_mode(&self) -> SelectionMode {
        match (self.any_staged_selected, self.any_working_tree_selected) {
            (true, _) => SelectionMode::StagedOnly,
            (false, true) => SelectionMode::WorkingTreeOnly,
            (false, false) => SelectionMode::None,
        }
    }

    /// Every selected entry, working tree first
    pub fn selected_files(&self) -> Vec<&FileChange> {
        self.selection
            .iter()
            .filter_map(|(collection, key)| self.collection(*collection).get(key))
            .collect()
    }

    pub fn selected_in(&self, collection: Collection) -> Vec<&FileChange> {
        self.selection
            .iter()
            .filter(|(c, _)| *c == collection)
            .filter_map(|(_, key)| self.collection(collection).get(key))
            .collect()
    }

    pub fn selected_working_tree_files(&self) -> Vec<&FileChange> {
        self.selected_in(Collection::WorkingTree)
    }

    fn count_selected(&self, collection: Collection) -> usize {
        self.selection.iter().filter(|(c, _)| *c == collection).count()
    }

    fn working_tree_selection_keys(&self) -> Vec<String> {
        self.working_tree
            .iter()
            .filter(|(_, file)| file.is_selected())
            .map(|(key, _)| key.clone())
            .collect()
    }
}

fn set_all<'a>(files: impl Iterator<Item = &'a mut FileChange>, selected: bool) {
    for file in files {
        file.set_selected(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status_parser::parse_status;

    fn state() -> RepositoryState {
        let mut state = RepositoryState::new();
        state.apply_status(&parse_status("MM a.txt\0M  b.txt\0 M c.txt\0?? d.txt\0?? e.txt\0").unwrap());
        state
    }

    fn selected_keys(state: &RepositoryState, collection: Collection) -> Vec<String> {
        state.selected_in(collection).iter().map(|f| f.key()).collect()
    }

    #[test]
    fn test_single_click_replaces_selection() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);

        state.select(&SelectRequest::click(Collection::WorkingTree, "a.txt", 0), &visible);
        state.select(&SelectRequest::click(Collection::WorkingTree, "c.txt", 1), &visible);

        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["c.txt"]);
        assert_eq!(state.selection_mode(), SelectionMode::WorkingTreeOnly);
    }

    #[test]
    fn test_multi_select_keeps_selection() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);

        state.select(&SelectRequest::click(Collection::WorkingTree, "a.txt", 0).toggle(true), &visible);
        state.select(&SelectRequest::click(Collection::WorkingTree, "d.txt", 2).toggle(true), &visible);
        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["a.txt", "d.txt"]);

        state.select(&SelectRequest::click(Collection::WorkingTree, "a.txt", 0).toggle(false), &visible);
        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["d.txt"]);
    }

    #[test]
    fn test_selecting_staged_clears_working_tree() {
        let mut state = state();
        let wt_visible = state.visible_keys(Collection::WorkingTree);
        let staged_visible = state.visible_keys(Collection::Staged);

        state.select(&SelectRequest::click(Collection::WorkingTree, "a.txt", 0), &wt_visible);
        let refresh = state.select(&SelectRequest::click(Collection::Staged, "a.txt", 0), &staged_visible);

        assert!(refresh);
        assert!(!state.any_working_tree_selected());
        assert!(state.any_staged_selected());
        assert_eq!(state.selection_mode(), SelectionMode::StagedOnly);
        assert!(state.selected_working_tree_files().is_empty());
    }

    #[test]
    fn test_shift_range_uses_displayed_order() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);
        assert_eq!(visible, vec!["a.txt", "c.txt", "d.txt", "e.txt"]);

        state.select(&SelectRequest::click(Collection::WorkingTree, "e.txt", 3), &visible);
        state.select(
            &SelectRequest::click(Collection::WorkingTree, "c.txt", 1).extend_from(3),
            &visible,
        );
        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["c.txt", "d.txt", "e.txt"]);
    }

    #[test]
    fn test_shift_range_skips_hidden_entries() {
        let mut state = state();
        state.set_filter(
            Collection::WorkingTree,
            crate::core::file_state::FileStateSet::from_states(&[crate::core::file_state::FileState::Untracked]),
        );
        let visible = state.visible_keys(Collection::WorkingTree);
        assert_eq!(visible, vec!["d.txt", "e.txt"]);

        state.select(&SelectRequest::click(Collection::WorkingTree, "d.txt", 0), &visible);
        state.select(&SelectRequest::click(Collection::WorkingTree, "e.txt", 1).extend_from(0), &visible);
        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["d.txt", "e.txt"]);
    }

    #[test]
    fn test_shift_range_skipped_after_collection_switch() {
        let mut state = state();
        let wt_visible = state.visible_keys(Collection::WorkingTree);
        let staged_visible = state.visible_keys(Collection::Staged);

        state.select(&SelectRequest::click(Collection::Staged, "a.txt", 0), &staged_visible);
        state.select(
            &SelectRequest::click(Collection::WorkingTree, "e.txt", 3).extend_from(0),
            &wt_visible,
        );
        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["e.txt"]);
        assert!(!state.any_staged_selected());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);

        assert!(state.select_all(Collection::WorkingTree, &visible));
        assert_eq!(state.selected_files().len(), 4);

        assert!(state.clear_selection());
        assert_eq!(state.selection_mode(), SelectionMode::None);
        assert!(!state.clear_selection());
    }

    #[test]
    fn test_selected_files_lists_working_tree_first() {
        let mut state = state();
        state.working_tree.get_mut("d.txt").unwrap().set_selected(true);
        state.staged.get_mut("a.txt").unwrap().set_selected(true);
        state.revalidate_selection();

        let keys: Vec<String> = state.selected_files().iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec!["d.txt", "a.txt"]);
    }

    #[test]
    fn test_staged_selection_does_not_request_diff() {
        let mut state = state();
        let staged_visible = state.visible_keys(Collection::Staged);
        assert!(!state.select(&SelectRequest::click(Collection::Staged, "b.txt", 1), &staged_visible));
    }

    #[test]
    fn test_removed_entry_drops_out_of_selection() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);
        state.select(&SelectRequest::click(Collection::WorkingTree, "d.txt", 2), &visible);

        state.apply_status(&parse_status("MM a.txt\0M  b.txt\0").unwrap());
        assert!(state.selected_files().is_empty());
        assert_eq!(state.selection_mode(), SelectionMode::None);
    }

    #[test]
    fn test_selection_survives_unrelated_poll() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);
        state.select(&SelectRequest::click(Collection::WorkingTree, "c.txt", 1), &visible);

        state.apply_status(&parse_status("MM a.txt\0 M c.txt\0?? f.txt\0").unwrap());
        assert_eq!(selected_keys(&state, Collection::WorkingTree), vec!["c.txt"]);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut state = state();
        let visible = state.visible_keys(Collection::WorkingTree);
        assert!(!state.select(&SelectRequest::click(Collection::WorkingTree, "zzz", 0), &visible));
        assert_eq!(state.selection_mode(), SelectionMode::None);
    }
}
