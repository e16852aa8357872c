use crate::classifier::QueryAnalysis;
use crate::dispatch::Dispatcher;
use crate::synthesis::{HistoryLayout, ProfileField, ResponseBlock};

const FIELD_WORDS: &[&str] = &["name", "email", "phone", "status", "information", "info"];
const PROFILE_PHRASES: &[&str] = &["get customer", "show me customer", "customer information"];

fn requested_field(analysis: &QueryAnalysis) -> Option<ProfileField> {
    if analysis.mentions("name") && !analysis.mentions("email") {
        Some(ProfileField::Name)
    } else if analysis.mentions("email") {
        Some(ProfileField::Email)
    } else if analysis.mentions("phone") {
        Some(ProfileField::Phone)
    } else if analysis.mentions("status") {
        Some(ProfileField::Status)
    } else {
        None
    }
}

pub(super) async fn run(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
) -> Vec<ResponseBlock> {
    if let Some(id) = analysis.customer_id {
        if analysis.mentions_any(&["what is", "what's"]) && analysis.mentions_any(FIELD_WORDS) {
            let block = match super::get_customer(dispatcher, id).await {
                Ok(customer) => match requested_field(analysis) {
                    Some(field) => ResponseBlock::CustomerField { customer, field },
                    None => ResponseBlock::CustomerProfile(customer),
                },
                Err(error) => ResponseBlock::failure(error),
            };
            return vec![block];
        }

        if analysis.mentions_any(PROFILE_PHRASES) {
            let block = match super::get_customer(dispatcher, id).await {
                Ok(customer) => ResponseBlock::CustomerProfile(customer),
                Err(error) => ResponseBlock::failure(error),
            };
            return vec![block];
        }

        if analysis.mentions_any(&["history", "tickets"]) {
            let block = match super::get_history(dispatcher, id).await {
                Ok(tickets) => ResponseBlock::TicketHistory {
                    customer_id: id,
                    tickets,
                    layout: HistoryLayout::Detailed,
                },
                Err(error) => ResponseBlock::failure(error),
            };
            return vec![block];
        }
    }

    if analysis.required_capabilities.is_empty() {
        return vec![ResponseBlock::Acknowledgement];
    }

    match super::handle_query(dispatcher, &analysis.raw_query, None).await {
        Ok(assessment) => vec![ResponseBlock::Solution(assessment.solution)],
        Err(error) => vec![ResponseBlock::failure(error)],
    }
}
