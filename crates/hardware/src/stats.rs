//! Run statistics.

use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct SimStats {
    /// Ticks elapsed since construction.
    pub ticks: u64,
    /// Start commands accepted.
    pub transfers: u64,
    pub transfers_completed: u64,
    pub transfers_failed: u64,
    /// Burst requests accepted by the memory subsystem.
    pub bursts: u64,
    /// Words pushed into the elastic buffer.
    pub words_read: u64,
    /// Words popped by the output stage.
    pub words_sent: u64,
    /// Words accepted by the stream consumer.
    pub words_out: u64,
    /// Ticks a response beat waited on a full buffer.
    pub resp_stalls: u64,
    /// Ticks the stream offer waited on a stalled consumer.
    pub out_stalls: u64,
}

impl SimStats {
    pub fn print(&self) {
        println!("==================== Run Statistics ====================");
        println!("Ticks:                {:>12}", self.ticks);
        println!("Transfers started:    {:>12}", self.transfers);
        println!("Transfers completed:  {:>12}", self.transfers_completed);
        println!("Transfers failed:     {:>12}", self.transfers_failed);
        println!("Bursts issued:        {:>12}", self.bursts);
        println!("Words read:           {:>12}", self.words_read);
        println!("Words sent:           {:>12}", self.words_sent);
        println!("Words emitted:        {:>12}", self.words_out);
        println!("Response stall ticks: {:>12}", self.resp_stalls);
        println!("Output stall ticks:   {:>12}", self.out_stalls);
        println!("========================================================");
    }
}
