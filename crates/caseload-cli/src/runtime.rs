// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use caseload_app::{PageKind, PageTab, case_record, client_record, notice_record};
use caseload_store::PrefStore;
use caseload_testkit::DemoData;
use caseload_view::{ColumnSpec, Layout, Record, StoredViewState};

/// Serves generated casework data and persists view settings in the
/// preferences store.
pub struct StoreRuntime {
    demo: DemoData,
    store: PrefStore,
}

impl StoreRuntime {
    pub fn new(demo: DemoData, store: PrefStore) -> Self {
        Self { demo, store }
    }
}

impl caseload_tui::AppRuntime for StoreRuntime {
    fn load_page_records(&mut self, page: PageKind, tab: PageTab) -> Result<Vec<Record>> {
        let records = match page {
            PageKind::Cases => self
                .demo
                .cases
                .iter()
                .filter(|case| tab.admits_case(case))
                .map(case_record)
                .collect(),
            PageKind::Clients => self
                .demo
                .clients
                .iter()
                .filter(|client| tab.admits_client(client))
                .map(client_record)
                .collect(),
            PageKind::Notices => self
                .demo
                .notices
                .iter()
                .filter(|notice| tab.admits_notice(notice))
                .map(notice_record)
                .collect(),
        };
        Ok(records)
    }

    fn load_view_state(
        &mut self,
        page: PageKind,
        default_layout: Layout,
        columns: &[ColumnSpec],
    ) -> Result<StoredViewState> {
        caseload_store::load_view_state(&self.store, page.as_str(), default_layout, columns)
    }

    fn save_view_state(&mut self, page: PageKind, stored: &StoredViewState) -> Result<()> {
        caseload_store::save_view_state(&self.store, page.as_str(), stored)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRuntime;
    use anyhow::Result;
    use caseload_app::{PageKind, PageTab};
    use caseload_store::PrefStore;
    use caseload_tui::AppRuntime;
    use caseload_view::{Layout, StoredViewState};

    fn demo_runtime() -> Result<StoreRuntime> {
        let demo = caseload_testkit::demo_data(11, 10, 6, 5);
        let store = PrefStore::open_memory()?;
        store.bootstrap()?;
        Ok(StoreRuntime::new(demo, store))
    }

    #[test]
    fn page_records_respect_the_tab_filters() -> Result<()> {
        let mut runtime = demo_runtime()?;

        let assigned = runtime.load_page_records(PageKind::Cases, PageTab::AssignedCases)?;
        let unassigned = runtime.load_page_records(PageKind::Cases, PageTab::UnassignedCases)?;
        let closed = runtime.load_page_records(PageKind::Cases, PageTab::ClosedCases)?;
        assert_eq!(assigned.len() + unassigned.len() + closed.len(), 10);
        assert!(!closed.is_empty());

        let all_notices = runtime.load_page_records(PageKind::Notices, PageTab::AllNotices)?;
        assert_eq!(all_notices.len(), 5);
        Ok(())
    }

    #[test]
    fn view_state_round_trips_through_the_store() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let columns = PageKind::Clients.columns();

        let mut stored = StoredViewState::defaults(Layout::Table, columns);
        let mut next = stored.view_settings.clone();
        next.layout = Layout::List;
        stored.apply_change(next, Layout::Table);
        runtime.save_view_state(PageKind::Clients, &stored)?;

        let loaded = runtime.load_view_state(PageKind::Clients, Layout::Table, columns)?;
        assert_eq!(loaded, stored);
        assert!(loaded.layout_customized);

        // Other pages are unaffected.
        let cases = runtime.load_view_state(
            PageKind::Cases,
            Layout::Table,
            PageKind::Cases.columns(),
        )?;
        assert!(!cases.layout_customized);
        Ok(())
    }
}
