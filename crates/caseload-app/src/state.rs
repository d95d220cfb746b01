// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{PageKind, PageTab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_page: PageKind,
    pub case_tab: PageTab,
    pub client_tab: PageTab,
    pub notice_tab: PageTab,
    pub help: HelpVisibility,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_page: PageKind::Cases,
            case_tab: PageTab::AssignedCases,
            client_tab: PageTab::ActiveClients,
            notice_tab: PageTab::UnreadNotices,
            help: HelpVisibility::Hidden,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    NextPage,
    PrevPage,
    SelectPage(PageKind),
    NextTab,
    PrevTab,
    EnterSearch,
    ExitToNav,
    OpenHelp,
    CloseHelp,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    PageChanged(PageKind),
    TabChanged(PageTab),
    HelpVisibilityChanged(HelpVisibility),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    /// The remembered tab for the active page. Each page keeps its own tab
    /// selection across page switches.
    pub fn active_tab(&self) -> PageTab {
        match self.active_page {
            PageKind::Cases => self.case_tab,
            PageKind::Clients => self.client_tab,
            PageKind::Notices => self.notice_tab,
        }
    }

    fn set_active_tab(&mut self, tab: PageTab) {
        match self.active_page {
            PageKind::Cases => self.case_tab = tab,
            PageKind::Clients => self.client_tab = tab,
            PageKind::Notices => self.notice_tab = tab,
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextPage => self.rotate_page(1),
            AppCommand::PrevPage => self.rotate_page(-1),
            AppCommand::SelectPage(page) => {
                if page == self.active_page {
                    return Vec::new();
                }
                self.active_page = page;
                vec![AppEvent::PageChanged(page)]
            }
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            AppCommand::OpenHelp => {
                self.help = HelpVisibility::Visible;
                vec![
                    AppEvent::HelpVisibilityChanged(self.help),
                    self.set_status("help open"),
                ]
            }
            AppCommand::CloseHelp => {
                self.help = HelpVisibility::Hidden;
                vec![
                    AppEvent::HelpVisibilityChanged(self.help),
                    self.set_status("help hidden"),
                ]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_page(&mut self, delta: isize) -> Vec<AppEvent> {
        let pages = PageKind::ALL;
        let current = pages
            .iter()
            .position(|page| *page == self.active_page)
            .unwrap_or(0) as isize;
        let len = pages.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_page = pages[next];
        vec![AppEvent::PageChanged(self.active_page)]
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = self.active_page.tabs();
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab())
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.set_active_tab(tabs[next]);
        vec![AppEvent::TabChanged(self.active_tab())]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
