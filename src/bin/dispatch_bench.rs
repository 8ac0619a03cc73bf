use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use systolic_dispatch::{accelerator_mode, multiply, Dims, ReferenceExecutor};

#[derive(Parser, Debug)]
#[command(name = "dispatch-bench", version, about = "Time int8 matmul dispatch through the reference executor")]
struct Args {
    /// External accelerator mode (0=CPU, 1=OS, 2=WS)
    #[arg(long, default_value_t = 0)]
    mode: i32,

    /// Output rows
    #[arg(long, default_value_t = 64)]
    dim_i: usize,

    /// Output columns
    #[arg(long, default_value_t = 64)]
    dim_j: usize,

    /// Reduction length
    #[arg(long, default_value_t = 64)]
    dim_k: usize,

    /// Power-of-two requantization divisor
    #[arg(long, default_value_t = 64)]
    divisor: i32,

    /// Apply ReLU
    #[arg(long, default_value_t = false)]
    relu: bool,

    /// Add a random bias
    #[arg(long, default_value_t = false)]
    bias: bool,

    /// Executor threads
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Iterations to time
    #[arg(long, default_value_t = 100)]
    iters: usize,

    /// RNG seed for the input matrices
    #[arg(long, default_value_t = 20240601)]
    seed: u64,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let dims = Dims::new(args.dim_i, args.dim_j, args.dim_k);
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let lhs: Vec<i8> = (0..dims.i * dims.k).map(|_| rng.gen()).collect();
    let rhs: Vec<i8> = (0..dims.k * dims.j).map(|_| rng.gen()).collect();
    let bias: Vec<i32> = (0..dims.i * dims.j).map(|_| rng.gen_range(-1024..1024)).collect();
    let mut out = vec![0i8; dims.i * dims.j];

    let mut exec = ReferenceExecutor::with_threads(args.threads)?;
    let t0 = Instant::now();
    for _ in 0..args.iters {
        multiply(&mut exec, args.mode, args.relu, dims, &lhs, &rhs, &mut out, args.divisor, args.bias.then_some(bias.as_slice()))
            .context("dispatch")?;
    }
    let dt = t0.elapsed();
    let macs = (dims.i * dims.j * dims.k * args.iters) as f64;
    let gmacs = if dt.as_secs_f64() > 0.0 { macs / dt.as_secs_f64() / 1e9 } else { 0.0 };
    let checksum: i64 = out.iter().map(|&v| v as i64).sum();
    let internal = accelerator_mode(args.mode);
    if args.json {
        let obj = serde_json::json!({
            "mode": args.mode,
            "dataflow": internal,
            "dims": [dims.i, dims.j, dims.k],
            "iters": args.iters,
            "threads": exec.threads(),
            "elapsed_s": dt.as_secs_f64(),
            "gmacs": gmacs,
            "checksum": checksum,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        println!("mode={} dataflow={} dims=({}, {}, {}) iters={} elapsed={:.3}s gmacs={:.3} checksum={}",
            args.mode, internal, dims.i, dims.j, dims.k, args.iters, dt.as_secs_f64(), gmacs, checksum);
    }
    Ok(())
}
