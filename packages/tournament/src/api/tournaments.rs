//! Tournament endpoints.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use super::client::BackendClient;
use crate::domains::tournament::models::{Tournament, TournamentDraft};
use crate::kernel::{ApiOutcome, BaseTournamentApi};

pub const GET_TOURNAMENTS_PATH: &str = "/tournament/get";
pub const UPDATE_TOURNAMENT_PATH: &str = "/tournament/update";
pub const CREATE_TOURNAMENT_PATH: &str = "/tournament/create";

/// `{ "data": ... }` request body.
#[derive(Debug, Serialize)]
struct DataBody<'a, T: Serialize> {
    data: &'a T,
}

#[async_trait]
impl BaseTournamentApi for BackendClient {
    async fn get_tournaments(&self) -> ApiOutcome<HashMap<String, Tournament>> {
        self.post(GET_TOURNAMENTS_PATH, &json!({})).await
    }

    async fn create_tournament(&self, draft: &TournamentDraft) -> ApiOutcome<Tournament> {
        self.post(CREATE_TOURNAMENT_PATH, &DataBody { data: draft }).await
    }

    async fn update_tournament(&self, tournament: &Tournament) -> ApiOutcome<Tournament> {
        self.post(UPDATE_TOURNAMENT_PATH, &DataBody { data: tournament })
            .await
    }
}
