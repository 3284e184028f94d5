//! Smoke-test binary for verifying Gemini API connectivity
//! This is a utility binary, not part of the main application

use career_assistant_backend::assistant::{self, UserProfile};
use career_assistant_backend::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Testing Gemini API connectivity from Rust...\n");

    // Step 1: Load configuration from environment
    println!("1. Loading configuration...");
    let config = Config::from_env();
    for warning in config.warnings() {
        eprintln!("   ⚠ {}", warning);
    }
    println!("   Model: {}", config.gemini.model);

    // Step 2: Check the API key
    println!("\n2. Checking GEMINI_API_KEY...");
    if config.gemini.key_configured() {
        println!(
            "   ✓ GEMINI_API_KEY is set (length: {} chars)",
            config.gemini.api_key.len()
        );
    } else {
        eprintln!("   ✗ GEMINI_API_KEY not set or still the placeholder");
        eprintln!("   Export it first: export GEMINI_API_KEY=\"your-key\"");
        return Err("Gemini API key not configured".into());
    }

    // Step 3: Acquire the assistant capability
    println!("\n3. Acquiring assistant capability...");
    let assistant = match assistant::acquire(&config.gemini) {
        Ok(assistant) => {
            println!("   ✓ Capability acquired");
            assistant
        }
        Err(e) => {
            eprintln!("   ✗ Acquisition failed: {}", e);
            return Err(e.into());
        }
    };

    // Step 4: Send a test chat turn
    println!("\n4. Sending test query...");
    println!("   Query: 'What is one good first step to become a data analyst?'");

    let profile = UserProfile {
        occupation: "Data Analyst".to_string(),
        skill_gap: "SQL, data visualization".to_string(),
        location: "Indonesia".to_string(),
    };

    match assistant
        .chat(
            &profile,
            &[],
            "What is one good first step to become a data analyst?",
        )
        .await
    {
        Ok(reply) => {
            println!("   ✓ Reply received:");
            println!("   {}", reply.trim());
        }
        Err(e) => {
            eprintln!("   ✗ Query failed:");
            eprintln!("   {}", e);
            eprintln!("\n   Troubleshooting:");
            eprintln!("   - Make sure GEMINI_API_KEY is valid: echo $GEMINI_API_KEY");
            eprintln!("   - Check the model name: echo $GEMINI_MODEL");
            return Err(e.into());
        }
    }

    println!("\n✓ Smoke test completed!");
    Ok(())
}
