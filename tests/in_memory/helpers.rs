//! Shared fixtures for command-surface integration tests.

use billwright::{
    app::Billwright,
    directory::{
        domain::{Client, CompanyId, UserId},
        ports::ClientDirectory,
    },
    project::{
        domain::{ProjectTemplate, TemplatePhase, TemplateTask},
        ports::TemplateRepository,
    },
    proposal::domain::{ContractingType, NewProposal, Proposal, ServiceType},
    settings::Settings,
};
use chrono::NaiveDate;
use rstest::fixture;

/// A wired application with one company and one client.
pub struct Workspace {
    /// The composition root under test.
    pub app: Billwright,
    /// Company owning every seeded record.
    pub company_id: CompanyId,
    /// Client billed by the seeded proposals.
    pub client: Client,
}

/// Provides a workspace whose client is already registered.
#[fixture]
pub async fn workspace() -> Workspace {
    let app = Billwright::with_system_clock(Settings::default());
    let company_id = CompanyId::new();
    let client = Client::new(company_id, "Acme Ltda").expect("valid client");
    app.clients().store(&client).await.expect("client stored");
    Workspace {
        app,
        company_id,
        client,
    }
}

/// Builds a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

impl Workspace {
    /// Drafts a proposal for the workspace client.
    pub async fn draft_proposal(&self, contracting: ContractingType) -> Proposal {
        self.app
            .proposals()
            .draft(
                NewProposal::new(
                    self.company_id,
                    self.client.id(),
                    UserId::new(),
                    "Commerce platform",
                    ServiceType::SoftwareDevelopment,
                    contracting,
                )
                .with_proposal_date(date(2024, 3, 1)),
            )
            .await
            .expect("proposal drafted")
    }

    /// Stores a two-phase template with three tasks.
    pub async fn store_template(&self) -> ProjectTemplate {
        let discovery = TemplateTask::new("Discovery", 1, 3).expect("valid task");
        let build = TemplateTask::new("Build", 2, 5)
            .expect("valid task")
            .with_predecessor(discovery.id());
        let handover = TemplateTask::new("Handover", 1, 2)
            .expect("valid task")
            .with_days_after_start(10);
        let template = ProjectTemplate::new(self.company_id, "Delivery")
            .expect("valid template")
            .with_phase(
                TemplatePhase::new("Execution", 1)
                    .expect("valid phase")
                    .with_task(discovery)
                    .with_task(build),
            )
            .with_phase(
                TemplatePhase::new("Closing", 2)
                    .expect("valid phase")
                    .with_task(handover),
            );
        self.app
            .templates()
            .store(&template)
            .await
            .expect("template stored");
        template
    }
}
