//! Deterministic text rendering of workflow results.

use concierge_core::domain::customer::{Customer, CustomerId};
use concierge_core::domain::ticket::{Ticket, TicketPriority};
use concierge_core::errors::ProviderError;

pub const ACKNOWLEDGEMENT: &str = "Query processed.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryLayout {
    /// Status, issue, priority and creation time per ticket.
    Detailed,
    /// One line per ticket including its id.
    WithIds,
    /// Appended under another block; no customer header.
    Compact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    EmailUpdated,
    PhoneUpdated,
    EmailChanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerTicket {
    pub customer_name: String,
    pub ticket: Ticket,
}

/// One renderable piece of an answer. Blocks render in order, one per line
/// group.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBlock {
    CustomerProfile(Customer),
    CustomerField { customer: Customer, field: ProfileField },
    /// `Customer: <name> (<status>)`
    CustomerSummary(Customer),
    CustomerList(Vec<Customer>),
    TicketHistory { customer_id: CustomerId, tickets: Vec<Ticket>, layout: HistoryLayout },
    PriorityTickets {
        priority: Option<TicketPriority>,
        total: usize,
        listed: Vec<CustomerTicket>,
    },
    OpenTicketSummary { active_customers: usize, with_open: Vec<(String, usize)> },
    UpdateConfirmation { kind: UpdateKind, value: String, customer: Customer },
    Greeting(String),
    Solution(String),
    Line(String),
    Failure(ProviderError),
    Acknowledgement,
}

impl ResponseBlock {
    pub fn failure(error: ProviderError) -> Self {
        Self::Failure(error)
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    fn render_into(&self, out: &mut Vec<String>) {
        match self {
            Self::CustomerProfile(customer) => out.push(format!(
                "Customer Information:\nName: {}\nEmail: {}\nPhone: {}\nStatus: {}",
                customer.name,
                customer.email,
                customer.phone_display(),
                customer.status
            )),
            Self::CustomerField { customer, field } => out.push(match field {
                ProfileField::Name => {
                    format!("The name of customer {} is {}.", customer.id, customer.name)
                }
                ProfileField::Email => {
                    format!("The email of customer {} is {}.", customer.id, customer.email)
                }
                ProfileField::Phone => format!(
                    "The phone of customer {} is {}.",
                    customer.id,
                    customer.phone_display()
                ),
                ProfileField::Status => {
                    format!("Customer {} status is {}.", customer.id, customer.status)
                }
            }),
            Self::CustomerSummary(customer) => {
                out.push(format!("Customer: {} ({})", customer.name, customer.status))
            }
            Self::CustomerList(customers) if customers.is_empty() => {
                out.push("No customers found".to_string())
            }
            Self::CustomerList(customers) => {
                out.push(format!("Customer List ({} customers):", customers.len()));
                out.extend(customers.iter().map(|c| {
                    format!("  • {} (ID: {}, Status: {})", c.name, c.id, c.status)
                }));
            }
            Self::TicketHistory { customer_id, tickets, layout } => {
                render_history(*customer_id, tickets, *layout, out)
            }
            Self::PriorityTickets { priority, total, listed } => {
                let qualifier =
                    priority.map(|p| format!("{}-priority ", p.as_str())).unwrap_or_default();
                if *total == 0 {
                    out.push(format!("No {qualifier}tickets found."));
                    return;
                }
                out.push(format!("Found {total} {qualifier}tickets:\n"));
                for entry in listed {
                    out.push(format!(
                        "  • {}: [{}] {}",
                        entry.customer_name,
                        entry.ticket.status_label(),
                        entry.ticket.issue
                    ));
                    out.push(format!("    Priority: {}", entry.ticket.priority.as_str()));
                }
            }
            Self::OpenTicketSummary { active_customers, with_open } => {
                out.push(format!("Found {active_customers} active customers"));
                if with_open.is_empty() {
                    out.push("No active customers with open tickets found.".to_string());
                } else {
                    out.push("\nActive customers with open tickets:".to_string());
                    out.extend(
                        with_open
                            .iter()
                            .map(|(name, count)| format!("- {name}: {count} open ticket(s)")),
                    );
                }
            }
            Self::UpdateConfirmation { kind, value, customer } => {
                render_update(*kind, value, customer, out)
            }
            Self::Greeting(name) => out.push(format!("Hello {name}!")),
            Self::Solution(text) | Self::Line(text) => out.push(text.clone()),
            Self::Failure(error) => out.push(format!("Error: {error}")),
            Self::Acknowledgement => out.push(ACKNOWLEDGEMENT.to_string()),
        }
    }
}

fn render_history(
    customer_id: CustomerId,
    tickets: &[Ticket],
    layout: HistoryLayout,
    out: &mut Vec<String>,
) {
    match layout {
        HistoryLayout::Compact => {
            out.push("\nTicket History:".to_string());
            out.extend(tickets.iter().map(|t| {
                format!(
                    "  - [{}] {} (Priority: {})",
                    t.status_label(),
                    t.issue,
                    t.priority.as_str()
                )
            }));
        }
        _ if tickets.is_empty() => out.push(format!("No tickets found for customer {customer_id}")),
        HistoryLayout::Detailed => {
            out.push(format!("Ticket History for Customer {customer_id}:"));
            for ticket in tickets {
                out.push(format!("  • [{}] {}", ticket.status_label(), ticket.issue));
                out.push(format!(
                    "    Priority: {}, Created: {}",
                    ticket.priority.as_str(),
                    ticket.created_display()
                ));
            }
        }
        HistoryLayout::WithIds => {
            out.push(format!("Ticket History for Customer {customer_id}:"));
            out.extend(tickets.iter().map(|t| {
                format!(
                    "  - [{}] {} (Priority: {}, ID: {})",
                    t.status_label(),
                    t.issue,
                    t.priority.as_str(),
                    t.id
                )
            }));
        }
    }
}

fn render_update(kind: UpdateKind, value: &str, customer: &Customer, out: &mut Vec<String>) {
    match kind {
        UpdateKind::EmailUpdated => {
            out.push(format!("✓ Email updated to {value} for customer {}", customer.id));
        }
        UpdateKind::PhoneUpdated => {
            out.push(format!("✓ Phone updated to {value} for customer {}", customer.id));
            out.push("\nUpdated Customer Information:".to_string());
            out.push(format!("  Name: {}", customer.name));
            out.push(format!("  Email: {}", customer.email));
            out.push(format!("  Phone: {}", customer.phone_display()));
        }
        UpdateKind::EmailChanged => {
            out.push(format!("✓ Email changed to {value} for customer {}", customer.id));
            out.push("\nUpdated Customer Information:".to_string());
            out.push(format!("  Name: {}", customer.name));
            out.push(format!("  Email: {}", customer.email));
        }
    }
}

pub struct ResponseSynthesizer;

impl ResponseSynthesizer {
    /// Joins rendered blocks with newlines; nothing to render yields the
    /// generic acknowledgement.
    pub fn render(blocks: &[ResponseBlock]) -> String {
        let mut lines = Vec::new();
        for block in blocks {
            block.render_into(&mut lines);
        }
        if lines.is_empty() {
            ACKNOWLEDGEMENT.to_string()
        } else {
            lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use concierge_core::domain::customer::{Customer, CustomerId, CustomerStatus};
    use concierge_core::domain::ticket::{Ticket, TicketId, TicketPriority, TicketStatus};
    use concierge_core::errors::ProviderError;

    use super::{
        CustomerTicket, HistoryLayout, ProfileField, ResponseBlock, ResponseSynthesizer, UpdateKind,
    };

    fn customer(phone: Option<&str>) -> Customer {
        let at = Utc.with_ymd_and_hms(2024, 1, 6, 9, 20, 0).single().expect("timestamp");
        Customer {
            id: CustomerId(5),
            name: "Charlie Brown".to_string(),
            email: "charlie.brown@email.com".to_string(),
            phone: phone.map(str::to_string),
            status: CustomerStatus::Active,
            created_at: at,
            updated_at: at,
        }
    }

    fn ticket(id: i64, status: TicketStatus) -> Ticket {
        Ticket {
            id: TicketId(id),
            customer_id: CustomerId(5),
            issue: "Password reset not received".to_string(),
            status,
            priority: TicketPriority::Medium,
            created_at: Utc.with_ymd_and_hms(2024, 2, 25, 17, 30, 0).single().expect("timestamp"),
        }
    }

    #[test]
    fn empty_input_renders_acknowledgement() {
        assert_eq!(ResponseSynthesizer::render(&[]), "Query processed.");
    }

    #[test]
    fn profile_uses_na_for_missing_phone() {
        let text = ResponseSynthesizer::render(&[ResponseBlock::CustomerProfile(customer(None))]);
        assert_eq!(
            text,
            "Customer Information:\nName: Charlie Brown\nEmail: charlie.brown@email.com\n\
             Phone: N/A\nStatus: active"
        );
    }

    #[test]
    fn specific_fields_render_sentences() {
        let text = ResponseSynthesizer::render(&[ResponseBlock::CustomerField {
            customer: customer(Some("555-0105")),
            field: ProfileField::Status,
        }]);
        assert_eq!(text, "Customer 5 status is active.");
    }

    #[test]
    fn history_layouts() {
        let tickets = vec![ticket(7, TicketStatus::InProgress)];

        let detailed = ResponseSynthesizer::render(&[ResponseBlock::TicketHistory {
            customer_id: CustomerId(5),
            tickets: tickets.clone(),
            layout: HistoryLayout::Detailed,
        }]);
        assert_eq!(
            detailed,
            "Ticket History for Customer 5:\n  \
             • [IN_PROGRESS] Password reset not received\n    \
             Priority: medium, Created: 2024-02-25 17:30:00"
        );

        let with_ids = ResponseSynthesizer::render(&[ResponseBlock::TicketHistory {
            customer_id: CustomerId(5),
            tickets,
            layout: HistoryLayout::WithIds,
        }]);
        assert!(with_ids.ends_with("(Priority: medium, ID: 7)"));

        let empty = ResponseSynthesizer::render(&[ResponseBlock::TicketHistory {
            customer_id: CustomerId(9),
            tickets: Vec::new(),
            layout: HistoryLayout::Detailed,
        }]);
        assert_eq!(empty, "No tickets found for customer 9");
    }

    #[test]
    fn priority_report_lists_tickets_after_blank_line() {
        let text = ResponseSynthesizer::render(&[ResponseBlock::PriorityTickets {
            priority: Some(TicketPriority::Medium),
            total: 1,
            listed: vec![CustomerTicket {
                customer_name: "Charlie Brown".to_string(),
                ticket: ticket(7, TicketStatus::Resolved),
            }],
        }]);
        assert_eq!(
            text,
            "Found 1 medium-priority tickets:\n\n  \
             • Charlie Brown: [RESOLVED] Password reset not received\n    \
             Priority: medium"
        );

        let none = ResponseSynthesizer::render(&[ResponseBlock::PriorityTickets {
            priority: None,
            total: 0,
            listed: Vec::new(),
        }]);
        assert_eq!(none, "No tickets found.");
    }

    #[test]
    fn phone_update_shows_refreshed_record() {
        let text = ResponseSynthesizer::render(&[ResponseBlock::UpdateConfirmation {
            kind: UpdateKind::PhoneUpdated,
            value: "555-9999".to_string(),
            customer: customer(Some("555-9999")),
        }]);
        assert_eq!(
            text,
            "✓ Phone updated to 555-9999 for customer 5\n\nUpdated Customer Information:\n  \
             Name: Charlie Brown\n  Email: charlie.brown@email.com\n  Phone: 555-9999"
        );
    }

    #[test]
    fn failures_render_with_error_prefix() {
        let text = ResponseSynthesizer::render(&[ResponseBlock::failure(
            ProviderError::CustomerNotFound(CustomerId(999)),
        )]);
        assert_eq!(text, "Error: Customer 999 not found");
    }
}
