use concierge_core::domain::agent::{AgentId, Capability};
use concierge_core::domain::customer::CustomerStatus;

use crate::classifier::QueryAnalysis;
use crate::dispatch::Dispatcher;
use crate::synthesis::{HistoryLayout, ResponseBlock};

const LIST_LIMIT: u32 = 10;
const PENDING: &str = "I'm working on your request.";

pub(super) async fn run(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
) -> Vec<ResponseBlock> {
    let customer_id = analysis.customer_id;

    if let Some(id) = customer_id.filter(|_| analysis.mentions_any(&["ticket", "history"])) {
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

    if analysis.mentions("list") && analysis.mentions("customer") {
        let status = if analysis.mentions("active") {
            Some(CustomerStatus::Active)
        } else if analysis.mentions("disabled") {
            Some(CustomerStatus::Disabled)
        } else {
            None
        };
        let block = match super::list_customers(dispatcher, status, LIST_LIMIT).await {
            Ok(customers) => ResponseBlock::CustomerList(customers),
            Err(error) => ResponseBlock::failure(error),
        };
        return vec![block];
    }

    let showing = analysis.mentions("show") && analysis.mentions("customer");
    if let Some(id) = customer_id.filter(|_| showing) {
        let block = match super::get_customer(dispatcher, id).await {
            Ok(customer) => ResponseBlock::CustomerProfile(customer),
            Err(error) => ResponseBlock::failure(error),
        };
        return vec![block];
    }

    negotiate(analysis, dispatcher).await
}

/// Two-round exchange: ask support first, and only when it asks for customer
/// context fetch the record and ask again with it attached.
async fn negotiate(analysis: &QueryAnalysis, dispatcher: &mut Dispatcher) -> Vec<ResponseBlock> {
    if !analysis.requires(Capability::Support) {
        return vec![ResponseBlock::line(PENDING)];
    }

    dispatcher.note(AgentId::Support, "Can you handle this query?");
    let first_round = super::handle_query(dispatcher, &analysis.raw_query, None).await;

    let mut customer = None;
    let mut second_round = None;
    let wants_context = matches!(&first_round, Ok(assessment) if assessment.needs_customer_context);
    if let Some(id) = analysis.customer_id.filter(|_| wants_context) {
        tracing::debug!(
            event_name = "router.negotiation.context_requested",
            correlation_id = %dispatcher.correlation_id(),
            customer_id = id.0,
            "support requested customer context"
        );
        if let Ok(record) = super::get_customer(dispatcher, id).await {
            second_round =
                Some(super::handle_query(dispatcher, &analysis.raw_query, Some(&record)).await);
            customer = Some(record);
        }
    }

    let mut blocks = Vec::new();
    if let Some(customer) = customer {
        blocks.push(ResponseBlock::CustomerSummary(customer));
    }
    match second_round.unwrap_or(first_round) {
        Ok(assessment) => blocks.push(ResponseBlock::Solution(assessment.solution)),
        Err(error) => blocks.push(ResponseBlock::failure(error)),
    }
    blocks
}
