//! Admin panel: leads and residents

use log::error;
use pgstay_auth::Resident;

use crate::app::navigation::{Navigator, Route, View};
use crate::leads::{Lead, LeadsClient};
use crate::residents::ResidentsClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Leads,
    Users,
}

pub struct AdminPanel {
    leads_client: LeadsClient,
    residents_client: ResidentsClient,
    navigator: Navigator,
    leads: Vec<Lead>,
    residents: Vec<Resident>,
    active_tab: AdminTab,
    selected_lead: Option<i64>,
    selected_resident: Option<i64>,
}

impl AdminPanel {
    pub fn new(
        leads_client: LeadsClient,
        residents_client: ResidentsClient,
        navigator: Navigator,
    ) -> Self {
        Self {
            leads_client,
            residents_client,
            navigator,
            leads: Vec::new(),
            residents: Vec::new(),
            active_tab: AdminTab::default(),
            selected_lead: None,
            selected_resident: None,
        }
    }

    /// Enter the panel and fetch both lists. Non-admins are redirected home
    /// and nothing is fetched. A failed fetch keeps the previous list.
    pub async fn load(&mut self) -> Route {
        let route = self.navigator.navigate(View::Admin);
        if route != Route::Show(View::Admin) {
            return route;
        }

        let (leads, residents) = tokio::join!(
            self.leads_client.list_all(),
            self.residents_client.list_all()
        );

        match leads {
            Ok(leads) => self.leads = leads,
            Err(e) => error!("Failed to fetch leads: {}", e),
        }
        match residents {
            Ok(residents) => self.residents = residents,
            Err(e) => error!("Failed to fetch residents: {}", e),
        }
        route
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    pub fn active_tab(&self) -> AdminTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: AdminTab) {
        self.active_tab = tab;
    }

    pub fn select_lead(&mut self, id: Option<i64>) -> Option<&Lead> {
        self.selected_lead = id;
        self.selected_lead()
    }

    pub fn selected_lead(&self) -> Option<&Lead> {
        let id = self.selected_lead?;
        self.leads.iter().find(|lead| lead.id == id)
    }

    pub fn select_resident(&mut self, id: Option<i64>) -> Option<&Resident> {
        self.selected_resident = id;
        self.selected_resident()
    }

    pub fn selected_resident(&self) -> Option<&Resident> {
        let id = self.selected_resident?;
        self.residents.iter().find(|resident| resident.id == id)
    }
}
