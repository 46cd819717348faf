//! Lucky Draw
//!
//! This demo runs a short series of fair draws through the coordinator.
//!
//! Key concepts:
//! - Participants loaded from a newline-separated list
//! - Winners favoured by how rarely they have won
//! - Settlement and reveal driven by timers
//!
//! Run with: cargo run --example lucky_draw
//! Set RUST_LOG=fairspin=debug to watch the machine work.

use fairspin::builder::SpinMachineBuilder;
use fairspin::{SpinConfig, SpinEvent};
use tracing_subscriber::EnvFilter;

const PARTICIPANTS: &str = "Ada\nGrace\nLinus\n\nBarbara\nGrace\nKen";
const DRAWS: usize = 12;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fairspin=info")),
        )
        .init();

    println!("=== Lucky Draw ===\n");

    // Short timings so the demo finishes quickly.
    let config = SpinConfig::from_json(r#"{ "spin_duration_ms": 200, "reveal_delay_ms": 50 }"#)?;
    let coordinator = SpinMachineBuilder::new().config(config).build_coordinator()?;

    let added = coordinator.add_participants(PARTICIPANTS.lines());
    println!("Loaded {} participants (blank and duplicate lines skipped)", added.len());
    for participant in &added {
        println!("  - {participant}");
    }
    println!();

    let mut events = coordinator.events();
    for draw in 1..=DRAWS {
        let weights = coordinator.inspect(|machine| machine.weights());
        let ticket = coordinator.request_spin()?;
        println!(
            "Draw {draw:>2}: weights {weights:?}, spinning to {:.1}°",
            ticket.target_rotation_degrees
        );

        loop {
            match events.recv().await? {
                SpinEvent::Revealed { winner, .. } => {
                    println!("         winner: {winner}");
                    break;
                }
                SpinEvent::Settled(settlement) => {
                    tracing::debug!(wins = settlement.wins, "winner credited");
                }
                _ => {}
            }
        }
    }

    println!("\nFinal tally:");
    for (name, wins) in coordinator.history().iter() {
        println!("  {name:<10} {wins}");
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
