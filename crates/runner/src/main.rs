//! Entity Bridge - facade repositories over differently shaped stores
//!
//! This crate is the *composition root*.
//! It assembles the adapters, wires them to the ports, validates every
//! entity adapter and runs a short catalogue walkthrough.

mod composition;
mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run::run().await
}
