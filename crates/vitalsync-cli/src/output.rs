//! Terminal output for server updates.
//!
//! The client library hands fully decoded payloads to the handlers
//! registered here; this module turns them into view models with the
//! `render` transforms and prints the result.

use vitalsync_client::{render, Client, ConnectionStatus};

/// Registers stdout printers for every update kind.
pub fn register_handlers(client: &Client) {
    let dispatcher = client.dispatcher();

    dispatcher.on_recommendations(|update| {
        if let Some(notice) = render::update_notice(&update) {
            println!("{notice}");
        }
        for rec in &update.ai_recommendations {
            println!("  [{}] {} ({})", rec.priority, rec.title, rec.category);
            if !rec.description.is_empty() {
                println!("      {}", rec.description);
            }
        }
        for card in render::recommendation_cards(&update) {
            println!("  {} [{} / {}]", card.title, card.category, card.content_type);
            if !card.summary.is_empty() {
                println!("      {}", card.summary);
            }
            println!("      {}", card.url);
        }
    });

    dispatcher.on_quick_recommendations(|update| {
        for row in render::quick_recommendation_rows(&update) {
            println!("  quick: [{}] {}", row.category, row.title);
        }
    });

    dispatcher.on_search_suggestions(|update| {
        if render::suggestions_visible(&update) {
            for entry in render::suggestion_entries(&update) {
                println!("  suggest: {} ({})", entry.text, entry.label);
            }
        }
    });

    dispatcher.on_health_response(|response| {
        tracing::info!(status = %response.status, "Server health");
    });

    dispatcher.on_status_notice(|notice| {
        println!("server: {}", notice.msg);
    });

    dispatcher.on_error_notice(|notice| {
        eprintln!("server error: {}", notice.message);
    });
}

/// Prints one line per connection status update.
pub fn print_status(status: &ConnectionStatus) {
    println!("[{}] {}", status.state, status.reason);
}
