use std::sync::Arc;

use concierge_agent::providers::SupportAgent;
use concierge_agent::{AgentRuntime, ComplexityTier, ProviderRegistry};
use concierge_core::domain::agent::AgentId;
use concierge_core::domain::customer::CustomerId;
use concierge_db::SupportSeedDataset;

fn runtime() -> AgentRuntime {
    let directory = Arc::new(SupportSeedDataset::in_memory().expect("seed dataset"));
    AgentRuntime::new(ProviderRegistry::standard(directory.clone(), directory))
}

#[tokio::test]
async fn customer_lookup_issues_a_single_dispatch() {
    let mut runtime = runtime();

    let answer = runtime.process("Get customer information for ID 5").await;

    assert_eq!(
        answer,
        "Customer Information:\nName: Charlie Brown\nEmail: charlie.brown@email.com\n\
         Phone: 555-0105\nStatus: active"
    );
    assert_eq!(runtime.dispatch_count(), 1);
    let trace = runtime.trace();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0].to, AgentId::CustomerData);
    assert_eq!(trace[0].summary, r#"get_customer with params: {"customer_id":5}"#);
}

#[tokio::test]
async fn phone_update_reports_refreshed_record() {
    let mut runtime = runtime();

    let answer = runtime.process("Update customer 3 phone to 555-9999").await;

    assert_eq!(
        answer,
        "✓ Phone updated to 555-9999 for customer 3\n\nUpdated Customer Information:\n  \
         Name: Bob Johnson\n  Email: bob.johnson@example.com\n  Phone: 555-9999"
    );
    assert!(runtime.trace()[0].summary.starts_with("update_customer with params:"));
    assert!(runtime.trace()[0].summary.contains(r#""phone":"555-9999""#));
}

#[tokio::test]
async fn help_request_fetches_customer_before_support() {
    let mut runtime = runtime();

    let answer = runtime.process("I'm customer 2 and having login issues").await;

    assert_eq!(
        answer,
        "Hello Jane Smith!\nI can assist you with your account. Let me pull up your information."
    );
    let outbound: Vec<_> =
        runtime.trace().iter().filter(|entry| entry.from == AgentId::Router).collect();
    assert_eq!(outbound.len(), 2);
    assert_eq!(outbound[0].to, AgentId::CustomerData);
    assert!(outbound[0].summary.starts_with("get_customer"));
    assert_eq!(outbound[1].to, AgentId::Support);
    assert!(outbound[1].summary.contains("customer_data"));
    assert!(outbound[1].summary.contains("Jane Smith"));
}

#[tokio::test]
async fn unmatched_query_is_acknowledged_without_dispatch() {
    let mut runtime = runtime();

    let answer = runtime.process("xyzzy").await;

    assert_eq!(answer, "Query processed.");
    assert_eq!(runtime.dispatch_count(), 0);
    assert!(runtime.trace().is_empty());
}

#[tokio::test]
async fn active_customers_with_open_tickets() {
    let mut runtime = runtime();

    let answer = runtime.process("Show me all active customers who have open tickets").await;

    assert_eq!(
        answer,
        "Found 6 active customers\n\nActive customers with open tickets:\n\
         - John Doe: 1 open ticket(s)\n\
         - Jane Smith: 1 open ticket(s)\n\
         - Alice Williams: 1 open ticket(s)\n\
         - Diana Prince: 1 open ticket(s)"
    );
    // One customer listing plus a history fetch for each of the first five.
    assert_eq!(runtime.dispatch_count(), 6);
}

#[tokio::test]
async fn trace_is_chronological_and_clearable() {
    let mut runtime = runtime();

    runtime.process("Show me all active customers who have open tickets").await;
    let dispatches = runtime.dispatch_count();
    let trace = runtime.trace();

    assert!(trace.len() >= 2 * dispatches);
    assert!(trace.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp));

    runtime.clear_trace();
    assert!(runtime.trace().is_empty());
}

#[tokio::test]
async fn repeated_queries_render_identically() {
    let mut runtime = runtime();

    let first = runtime.process("Get customer information for ID 5").await;
    let second = runtime.process("Get customer information for ID 5").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn high_priority_report_lists_matching_tickets() {
    let mut runtime = runtime();

    let answer = runtime.process("What is the status of all high priority tickets?").await;

    assert_eq!(
        answer,
        "Found 3 high-priority tickets:\n\n  \
         • John Doe: [OPEN] Cannot login to account\n    Priority: high\n  \
         • Alice Williams: [OPEN] Payment failed on renewal\n    Priority: high\n  \
         • Fiona Green: [OPEN] Suspected unauthorized access\n    Priority: high"
    );
    assert_eq!(runtime.dispatch_count(), 7);
}

#[tokio::test]
async fn escalation_query_is_answered_by_support() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("I've been charged twice, please refund immediately!");
    assert_eq!(analysis.complexity_tier, ComplexityTier::Simple);

    let answer = runtime.process("I've been charged twice, please refund immediately!").await;
    assert_eq!(
        answer,
        "I can help you with billing issues. Let me review your account and recent transactions."
    );
    assert_eq!(runtime.trace()[0].to, AgentId::Support);
}

#[tokio::test]
async fn email_update_with_history_persists() {
    let mut runtime = runtime();

    let answer = runtime
        .process("Update my email to newemail@test.com and show my ticket history for customer 1")
        .await;
    assert_eq!(
        answer,
        "✓ Email updated to newemail@test.com for customer 1\n\nTicket History:\n  \
         - [OPEN] Cannot login to account (Priority: high)\n  \
         - [RESOLVED] Request for invoice copy (Priority: low)"
    );

    let follow_up = runtime.process("What is the email of customer 1?").await;
    assert_eq!(follow_up, "The email of customer 1 is newemail@test.com.");
}

#[tokio::test]
async fn missing_email_is_reported_inline() {
    let mut runtime = runtime();

    let answer = runtime.process("Update customer 2 email please").await;

    assert_eq!(answer, "Could not extract email address from query");
    assert_eq!(runtime.dispatch_count(), 0);
}

#[tokio::test]
async fn negotiation_requeries_support_with_context() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("I need help with my account, customer id 4");
    assert_eq!(analysis.complexity_tier, ComplexityTier::Complex);

    let answer = runtime.process("I need help with my account, customer id 4").await;
    assert_eq!(
        answer,
        "Customer: Alice Williams (active)\n\
         I can assist you with your account. Let me pull up your information."
    );
    assert_eq!(runtime.dispatch_count(), 3);
    assert_eq!(runtime.trace()[0].summary, "Can you handle this query?");
    assert_eq!(runtime.trace().len(), 7);
}

#[tokio::test]
async fn unknown_customer_renders_provider_error() {
    let mut runtime = runtime();

    let answer = runtime.process("Get customer information for ID 999").await;

    assert_eq!(answer, "Error: Customer 999 not found");
}

#[tokio::test]
async fn open_ticket_uses_analysed_urgency() {
    let mut runtime = runtime();

    let created = runtime.open_ticket(CustomerId(8), "Account locked out", None).await;
    assert_eq!(created, "Ticket #11 created for customer 8 (high priority)");

    let rejected = runtime.open_ticket(CustomerId(404), "Anything", None).await;
    assert_eq!(rejected, "Error: Failed to create ticket for customer 404");
}

#[tokio::test]
async fn email_change_reports_name_and_new_address() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("Change email for customer 6 to diana@new.org");
    assert_eq!(analysis.complexity_tier, ComplexityTier::MultiStep);

    let answer = runtime.process("Change email for customer 6 to diana@new.org").await;
    assert_eq!(
        answer,
        "✓ Email changed to diana@new.org for customer 6\n\nUpdated Customer Information:\n  \
         Name: Diana Prince\n  Email: diana@new.org"
    );
    assert_eq!(runtime.dispatch_count(), 1);
}

#[tokio::test]
async fn customer_listing_applies_status_filter() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("List active customers");
    assert_eq!(analysis.complexity_tier, ComplexityTier::Complex);

    let answer = runtime.process("List active customers").await;
    assert_eq!(
        answer,
        "Customer List (6 customers):\n  \
         • John Doe (ID: 1, Status: active)\n  \
         • Jane Smith (ID: 2, Status: active)\n  \
         • Alice Williams (ID: 4, Status: active)\n  \
         • Charlie Brown (ID: 5, Status: active)\n  \
         • Diana Prince (ID: 6, Status: active)\n  \
         • Fiona Green (ID: 8, Status: active)"
    );
    assert!(runtime.trace()[0].summary.contains(r#""status":"active""#));
}

#[tokio::test]
async fn show_customer_renders_full_profile() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("Show me customer 3 profile");
    assert_eq!(analysis.complexity_tier, ComplexityTier::Complex);

    let answer = runtime.process("Show me customer 3 profile").await;
    assert_eq!(
        answer,
        "Customer Information:\nName: Bob Johnson\nEmail: bob.johnson@example.com\n\
         Phone: 555-0103\nStatus: disabled"
    );
    assert_eq!(runtime.dispatch_count(), 1);
    assert_eq!(runtime.trace()[0].to, AgentId::CustomerData);
}

#[tokio::test]
async fn negotiation_without_context_request_answers_in_one_round() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("Customer 3 has a billing question");
    assert_eq!(analysis.complexity_tier, ComplexityTier::Complex);

    let answer = runtime.process("Customer 3 has a billing question").await;
    assert_eq!(
        answer,
        "I can help you with billing issues. Let me review your account and recent transactions."
    );
    assert_eq!(runtime.dispatch_count(), 1);
    assert_eq!(runtime.trace()[0].summary, "Can you handle this query?");
    assert_eq!(runtime.trace().len(), 3);
}

#[tokio::test]
async fn complex_query_without_support_is_left_pending() {
    let mut runtime = runtime();

    let analysis = runtime.analyze("Get all profile data");
    assert_eq!(analysis.complexity_tier, ComplexityTier::Complex);

    let answer = runtime.process("Get all profile data").await;
    assert_eq!(answer, "I'm working on your request.");
    assert_eq!(runtime.dispatch_count(), 0);
}

#[tokio::test]
async fn missing_phone_is_reported_inline() {
    let mut runtime = runtime();

    let answer = runtime.process("Update customer 3 phone please").await;

    assert_eq!(answer, "Could not extract phone number from query");
    assert_eq!(runtime.dispatch_count(), 0);
}

#[tokio::test]
async fn priority_report_without_data_provider_fails_softly() {
    let directory = Arc::new(SupportSeedDataset::in_memory().expect("seed dataset"));
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(SupportAgent::new(directory)));
    let mut runtime = AgentRuntime::new(registry);

    let answer = runtime.process("What is the status of high priority tickets?").await;

    assert_eq!(answer, "Unable to retrieve ticket data.");
    assert_eq!(runtime.dispatch_count(), 1);
}
