mod channel;
mod filter;
mod simulator;
