//! Raw backend access.

use shopfront_client::{ClientState, RequestOptions, ServiceCallRecord, ServiceEvent};

use super::CommandError;

/// GET `path` and print the JSON body.
///
/// On failure the classified service report is printed before the error is
/// returned.
#[allow(clippy::print_stdout)]
pub async fn get(
    state: &ClientState,
    path: &str,
    query: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = RequestOptions::new();
    for pair in query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidQuery(pair.clone()))?;
        options = options.query(key, value);
    }

    let path = if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    };

    let mut events = state.api().subscribe();
    match state.api().get_with(&path, options).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            Ok(())
        }
        Err(e) => {
            while let Ok(event) = events.try_recv() {
                match event {
                    ServiceEvent::Failure(record) => print_record(&record),
                    ServiceEvent::SessionExpired { redirect_to } => {
                        println!("Session expired; sign in again ({redirect_to})");
                    }
                }
            }
            Err(e.into())
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_record(record: &ServiceCallRecord) {
    println!("Service:   {}", record.service_name);
    println!("           {}", record.description);
    println!("Endpoint:  {}", record.endpoint);
    if let Some(status) = record.status {
        println!("Status:    {status}");
    }
    println!("Error:     {}", record.original_error);
    println!("At:        {}", record.timestamp.to_rfc3339());
    println!("To restore the connection:");
    for (i, step) in record.connection_steps.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
}
