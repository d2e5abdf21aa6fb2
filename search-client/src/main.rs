//! Search client demo.
//!
//! Walks the full lifecycle of a search index against the configured
//! backend: existence check, schema creation, population, per-document
//! mutations, point lookup, filtered search, and teardown.

use search_client::{sample, DemoError, Dependencies};
use search_client_services::{BatchOutcome, SearchRequest};
use search_client_shared::{Document, FieldValue};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DemoError> {
    let deps = Dependencies::new()?;
    let schema = sample::document_index();

    println!("Search client demo ({})", deps.backend);
    println!();

    println!("Checking if index exists");
    if !deps.index_service.exists(sample::INDEX_NAME).await? {
        println!("Index does not exist");
    }

    println!("Creating the index");
    deps.index_service.create_or_update(&schema).await?;
    println!("Created index");

    println!("Getting the index");
    if let Some(fetched) = deps.index_service.get(sample::INDEX_NAME).await? {
        println!(
            "Found index {} with {} fields",
            fetched.name,
            fetched.fields.len()
        );
    }

    println!("Populating index with documents");
    let outcome = deps
        .document_service
        .create(&schema, sample::seed_documents())
        .await?;
    report(&outcome);

    println!("Deleting documents from index");
    let outcome = deps
        .document_service
        .delete(&schema, vec!["5".to_string(), "6".to_string()])
        .await?;
    report(&outcome);

    println!("Updating documents in index");
    let outcome = deps
        .document_service
        .update(&schema, vec![sample::document("4", "json")])
        .await?;
    report(&outcome);

    println!("Upserting documents in index");
    let upserts = vec![
        sample::document("4", "xml"),
        sample::document("5", "json"),
        sample::document("6", "xml"),
    ];
    let outcome = deps.document_service.upsert(&schema, upserts).await?;
    report(&outcome);

    println!("Getting document by key");
    let select = vec!["title".to_string(), "type".to_string()];
    match deps
        .document_service
        .get_by_key(sample::INDEX_NAME, "1", &select)
        .await?
    {
        Some(document) => println!(
            "Found document: {}",
            serde_json::to_string_pretty(&document).unwrap_or_default()
        ),
        None => println!("Document 1 not found"),
    }

    println!("Searching for documents with a type filter");
    let request = SearchRequest::new("").with_filter("type eq 'json'");
    let hits = deps
        .document_service
        .search(sample::INDEX_NAME, &request)
        .await?;
    println!("Found {} documents, iterating over them now", hits.len());
    for hit in &hits {
        println!(
            "Document: {}, title: {}, type: {} (score {:.2})",
            text_field(&hit.document, "id"),
            text_field(&hit.document, "title"),
            text_field(&hit.document, "type"),
            hit.score
        );
    }
    println!("Search complete");

    println!("Deleting the index");
    deps.index_service.delete(sample::INDEX_NAME).await?;
    println!("Deleted index");

    Ok(())
}

/// Print a batch outcome, listing any per-item failures.
fn report(outcome: &BatchOutcome) {
    if outcome.is_complete_success() {
        println!("All {} items succeeded", outcome.total());
    } else {
        println!(
            "{} of {} items failed:",
            outcome.failures.len(),
            outcome.total()
        );
        for (key, failure) in &outcome.failures {
            println!("  {}: status {}: {}", key, failure.status, failure.message);
        }
    }
}

fn text_field<'a>(document: &'a Document, name: &str) -> &'a str {
    document
        .get(name)
        .and_then(FieldValue::as_text)
        .unwrap_or("<missing>")
}
