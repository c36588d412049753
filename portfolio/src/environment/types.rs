use portfolio_core_contact_impl::{mail::MailChannel, relay::RelayChannel, ContactFeatureServiceImpl};
use portfolio_core_health_impl::HealthFeatureServiceImpl;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_extern_impl::relay::RelayApiServiceImpl;
use portfolio_persistence_file::FileBackupRepository;
use portfolio_shared_impl::time::TimeServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;

// Infrastructure
pub type Email = EmailServiceImpl;
pub type Backup = FileBackupRepository;

// Shared
pub type Time = TimeServiceImpl;
pub type Template = TemplateServiceImpl;

// Extern
pub type RelayApi = RelayApiServiceImpl;

// Channels
pub type Mail = MailChannel<Email, Template>;
pub type Relay = RelayChannel<RelayApi>;

// Core
pub type Contact = ContactFeatureServiceImpl<Time, Template, Mail, Relay, Backup>;
pub type Health = HealthFeatureServiceImpl<Time, Email, Backup>;

// API
pub type RestServer = portfolio_api_rest::RestServer<Health, Contact>;
