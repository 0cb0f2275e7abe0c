//! Calling kernels directly with typed arguments.
//!
//! Run with: `cargo run --example typed_kernels`

use algo_ta::indicators::momentum::{macd, rsi};
use algo_ta::indicators::trend::{ema, sma, supertrend};
use algo_ta::indicators::volatility::atr;
use algo_ta::Error;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let close: Vec<f64> = vec![
        44.34, 44.09, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61, 46.28,
        46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.21, 46.25, 45.71, 46.45, 45.78, 45.35, 44.03,
        44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
    ];
    let high: Vec<f64> = close.iter().map(|c| c * 1.01).collect();
    let low: Vec<f64> = close.iter().map(|c| c * 0.99).collect();

    let sma_5 = sma(&close, 5)?;
    let ema_5 = ema(&close, 5)?;
    println!("{:>5} {:>9} {:>9} {:>9}", "bar", "close", "sma(5)", "ema(5)");
    for i in 4..close.len() {
        println!("{i:>5} {:>9.4} {:>9.4} {:>9.4}", close[i], sma_5[i], ema_5[i]);
    }
    println!();

    let rsi_14 = rsi(&close, 14)?;
    let m = macd(&close, 5, 10, 3)?;
    let atr_7 = atr(&high, &low, &close, 7)?;
    let st = supertrend(&high, &low, &close, 7, 3.0)?;
    println!("last bar: rsi={:.2} macd={:.4} signal={:.4} atr={:.4}", rsi_14[31], m.macd[31], m.signal[31], atr_7[31]);
    let trend = if st.direction[31] < 0.0 { "up" } else { "down" };
    println!("supertrend {:.4} ({trend})", st.supertrend[31]);
    println!();

    // Too little history is not an error: the output is all NaN.
    let short = sma(&close[..3], 10)?;
    println!("sma(10) over 3 bars: {short:?}");

    // Invalid parameters are rejected before any computation.
    match sma(&close, 0) {
        Err(Error::InvalidParameter { .. }) => println!("sma(0) rejected"),
        other => println!("unexpected: {other:?}"),
    }
    Ok(())
}
