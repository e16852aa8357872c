use std::sync::OnceLock;

use regex::Regex;

use concierge_core::domain::customer::{CustomerId, CustomerUpdate};
use concierge_core::domain::ticket::TicketPriority;

use crate::classifier::QueryAnalysis;
use crate::dispatch::Dispatcher;
use crate::synthesis::{CustomerTicket, HistoryLayout, ResponseBlock, UpdateKind};

/// Customers whose history is scanned for the priority report.
const REPORT_CUSTOMER_CAP: usize = 10;
/// Tickets listed in the priority report.
const REPORT_TICKET_CAP: usize = 10;
/// Customers whose history is scanned for open tickets.
const OPEN_TICKET_CUSTOMER_CAP: usize = 5;

const HELP_WORDS: &[&str] = &["help", "need", "having", "here", "issue", "problem"];

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").ok()).as_ref()
}

fn phone_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{3}-?\d{4}").ok()).as_ref()
}

/// First email address in `query`, case preserved.
pub fn extract_email(query: &str) -> Option<&str> {
    email_pattern().and_then(|re| re.find(query)).map(|m| m.as_str())
}

/// First `NNN-NNNN` or `NNNNNNN` phone fragment in `query`.
pub fn extract_phone(query: &str) -> Option<&str> {
    phone_pattern().and_then(|re| re.find(query)).map(|m| m.as_str())
}

pub(super) async fn run(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
) -> Vec<ResponseBlock> {
    let id = analysis.customer_id;
    let updating = analysis.mentions("update");

    if analysis.mentions_any(&["what is", "status"])
        && analysis.mentions("ticket")
        && analysis.mentions("priority")
    {
        return priority_report(analysis, dispatcher).await;
    }

    if analysis.mentions("active customers") && analysis.mentions("tickets") {
        return open_ticket_summary(dispatcher).await;
    }

    if let Some(id) = id {
        if updating && analysis.mentions("email") {
            return update_email(analysis, dispatcher, id).await;
        }
        if updating && analysis.mentions("phone") {
            return update_phone(analysis, dispatcher, id).await;
        }
        if analysis.mentions("change") && analysis.mentions("email") {
            return change_email(analysis, dispatcher, id).await;
        }
        if analysis.mentions_any(&["ticket", "history"]) {
            let block = match super::get_history(dispatcher, id).await {
                Ok(tickets) => ResponseBlock::TicketHistory {
                    customer_id: id,
                    tickets,
                    layout: HistoryLayout::WithIds,
                },
                Err(error) => ResponseBlock::failure(error),
            };
            return vec![block];
        }
        if analysis.mentions_any(HELP_WORDS) {
            return assisted_help(analysis, dispatcher, id).await;
        }
    }

    vec![ResponseBlock::Acknowledgement]
}

async fn priority_report(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
) -> Vec<ResponseBlock> {
    let priority = if analysis.mentions("high") {
        Some(TicketPriority::High)
    } else if analysis.mentions("medium") {
        Some(TicketPriority::Medium)
    } else if analysis.mentions("low") {
        Some(TicketPriority::Low)
    } else {
        None
    };

    let customers = match super::premium_customers(dispatcher).await {
        Ok(customers) => customers,
        Err(_) => return vec![ResponseBlock::line("Unable to retrieve ticket data.")],
    };

    let mut matching = Vec::new();
    for customer in customers.into_iter().take(REPORT_CUSTOMER_CAP) {
        let Ok(tickets) = super::get_history(dispatcher, customer.id).await else {
            continue;
        };
        matching.extend(
            tickets
                .into_iter()
                .filter(|ticket| priority.map_or(true, |p| ticket.priority == p))
                .map(|ticket| CustomerTicket { customer_name: customer.name.clone(), ticket }),
        );
    }

    let total = matching.len();
    matching.truncate(REPORT_TICKET_CAP);
    vec![ResponseBlock::PriorityTickets { priority, total, listed: matching }]
}

async fn open_ticket_summary(dispatcher: &mut Dispatcher) -> Vec<ResponseBlock> {
    let customers = match super::premium_customers(dispatcher).await {
        Ok(customers) => customers,
        Err(error) => return vec![ResponseBlock::failure(error)],
    };

    let active_customers = customers.len();
    let mut with_open = Vec::new();
    for customer in customers.into_iter().take(OPEN_TICKET_CUSTOMER_CAP) {
        if let Ok(tickets) = super::get_history(dispatcher, customer.id).await {
            let open = tickets.iter().filter(|ticket| ticket.is_open()).count();
            if open > 0 {
                with_open.push((customer.name, open));
            }
        }
    }

    vec![ResponseBlock::OpenTicketSummary { active_customers, with_open }]
}

async fn update_email(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
    id: CustomerId,
) -> Vec<ResponseBlock> {
    let Some(email) = extract_email(&analysis.raw_query) else {
        return vec![ResponseBlock::line("Could not extract email address from query")];
    };

    let updated = super::update_customer(dispatcher, id, &CustomerUpdate::email(email)).await;
    let mut blocks = vec![match updated {
        Ok(customer) => ResponseBlock::UpdateConfirmation {
            kind: UpdateKind::EmailUpdated,
            value: email.to_string(),
            customer,
        },
        Err(error) => ResponseBlock::line(format!("Error updating email: {error}")),
    }];

    if analysis.mentions_any(&["history", "ticket"]) {
        blocks.push(match super::get_history(dispatcher, id).await {
            Ok(tickets) => ResponseBlock::TicketHistory {
                customer_id: id,
                tickets,
                layout: HistoryLayout::Compact,
            },
            Err(_) => ResponseBlock::line("No tickets found"),
        });
    }
    blocks
}

async fn update_phone(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
    id: CustomerId,
) -> Vec<ResponseBlock> {
    let Some(phone) = extract_phone(&analysis.raw_query) else {
        return vec![ResponseBlock::line("Could not extract phone number from query")];
    };

    let block = match super::update_customer(dispatcher, id, &CustomerUpdate::phone(phone)).await {
        Ok(customer) => ResponseBlock::UpdateConfirmation {
            kind: UpdateKind::PhoneUpdated,
            value: phone.to_string(),
            customer,
        },
        Err(error) => ResponseBlock::line(format!("Error updating phone: {error}")),
    };
    vec![block]
}

async fn change_email(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
    id: CustomerId,
) -> Vec<ResponseBlock> {
    let Some(email) = extract_email(&analysis.raw_query) else {
        return vec![ResponseBlock::line("Could not extract email address from query")];
    };

    let block = match super::update_customer(dispatcher, id, &CustomerUpdate::email(email)).await {
        Ok(customer) => ResponseBlock::UpdateConfirmation {
            kind: UpdateKind::EmailChanged,
            value: email.to_string(),
            customer,
        },
        Err(error) => ResponseBlock::line(format!("Error changing email: {error}")),
    };
    vec![block]
}

async fn assisted_help(
    analysis: &QueryAnalysis,
    dispatcher: &mut Dispatcher,
    id: CustomerId,
) -> Vec<ResponseBlock> {
    let customer = match super::get_customer(dispatcher, id).await {
        Ok(customer) => customer,
        Err(error) => return vec![ResponseBlock::failure(error)],
    };

    match super::handle_query(dispatcher, &analysis.raw_query, Some(&customer)).await {
        Ok(assessment) => vec![
            ResponseBlock::Greeting(customer.name),
            ResponseBlock::Solution(assessment.solution),
        ],
        Err(_) => vec![ResponseBlock::line("I'm here to help. Please provide more details.")],
    }
}
