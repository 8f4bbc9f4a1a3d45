//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    HelpDeskCommand, HelpDeskQuery, ListingCommand, ListingQuery, LoginService,
    RegistrationCommand, TransactionCommand, TransactionQuery, UserProfileCommand,
    UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub profiles: Arc<dyn UserProfileQuery>,
    pub profile_updates: Arc<dyn UserProfileCommand>,
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub transactions: Arc<dyn TransactionCommand>,
    pub transactions_query: Arc<dyn TransactionQuery>,
    pub help_desk: Arc<dyn HelpDeskCommand>,
    pub help_desk_query: Arc<dyn HelpDeskQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub profiles: Arc<dyn UserProfileQuery>,
    pub profile_updates: Arc<dyn UserProfileCommand>,
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub transactions: Arc<dyn TransactionCommand>,
    pub transactions_query: Arc<dyn TransactionQuery>,
    pub help_desk: Arc<dyn HelpDeskCommand>,
    pub help_desk_query: Arc<dyn HelpDeskQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            registration,
            profiles,
            profile_updates,
            listings,
            listings_query,
            transactions,
            transactions_query,
            help_desk,
            help_desk_query,
        } = ports;
        Self {
            login,
            registration,
            profiles,
            profile_updates,
            listings,
            listings_query,
            transactions,
            transactions_query,
            help_desk,
            help_desk_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
