//! ratha-odom - Closed-loop dry run of the steering controller
//!
//! Drives the controller with a constant reference twist and feeds the
//! resulting wheel command straight back as ideal feedback, so the reported
//! odometry shows what the kinematics and integration make of a perfect
//! vehicle.
//!
//! # Usage
//!
//! ```bash
//! # Ten seconds on the default vehicle
//! ratha-odom --linear 1.0 --angular 0.2 --duration 10
//!
//! # Tricycle with velocity feedback from a config file
//! ratha-odom --config ratha.toml --layout tricycle --integration runge-kutta2
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use ratha_odom::{
    IntegrationMethod, KinematicLayout, Pose2D, RathaConfig, RathaError, Result, Steering,
    SteeringCommand, SteeringController, Traction, Twist2D, WheelSample,
};

#[derive(Parser)]
#[command(name = "ratha-odom")]
#[command(about = "Simulate steered-vehicle odometry under a constant reference")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference linear velocity (m/s)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    linear: f64,

    /// Reference angular velocity (rad/s)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angular: f64,

    /// Simulated duration (s)
    #[arg(short, long, default_value_t = 10.0)]
    duration: f64,

    /// Control rate (Hz)
    #[arg(short, long, default_value_t = 50.0)]
    rate: f64,

    /// Override the configured wheel layout
    #[arg(long, value_enum)]
    layout: Option<KinematicLayout>,

    /// Override the configured integration method
    #[arg(long, value_enum)]
    integration: Option<IntegrationMethod>,

    /// Integrate the command instead of simulated feedback
    #[arg(long)]
    open_loop: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.rate.is_finite() || args.rate <= 0.0 {
        return Err(RathaError::InvalidParameter(format!(
            "rate must be > 0, got {}",
            args.rate
        )));
    }

    let config = load_config(args)?;
    let mut controller = SteeringController::from_config(&config)?;
    let period = 1.0 / args.rate;
    let period_us = (period * 1_000_000.0).round() as u64;
    let ticks = (args.duration.max(0.0) * args.rate).round() as u64;

    log::info!("ratha-odom simulation");
    log::info!("  Layout: {}", config.controller.layout);
    log::info!("  Integration: {:?}", config.odometry.integration);
    log::info!(
        "  Feedback: {}",
        if config.controller.open_loop {
            "open loop"
        } else if config.controller.position_feedback {
            "position"
        } else {
            "velocity"
        }
    );
    log::info!(
        "  Reference: {:.3} m/s, {:.3} rad/s for {} ticks at {:.1} Hz",
        args.linear,
        args.angular,
        ticks,
        args.rate
    );

    let reference = Twist2D::new(args.linear, args.angular);
    let position_feedback = config.controller.position_feedback;
    let mut feedback = FeedbackSimulator::default();
    let mut now_us = 0u64;

    for _ in 0..ticks {
        now_us += period_us;
        controller.set_reference(reference, now_us, now_us);

        let sample = feedback.sample(position_feedback);
        let state = controller.update(now_us, period, sample.as_ref());
        feedback.apply(&state.command, period);

        log::debug!(
            "t={:.3}s pose=({:.4}, {:.4}, {:.4}) twist=({:.4}, {:.4})",
            now_us as f64 / 1e6,
            state.pose.x,
            state.pose.y,
            state.pose.theta,
            state.twist.linear,
            state.twist.angular
        );
    }

    let odometry = controller.odometry();
    let pose = odometry.pose();
    log::info!(
        "Final pose: x={:.4} m, y={:.4} m, theta={:.4} rad",
        pose.x,
        pose.y,
        pose.theta
    );
    log::info!(
        "Distance from start: {:.4} m",
        pose.distance(&Pose2D::identity())
    );
    log::info!(
        "Smoothed twist: linear={:.4} m/s, angular={:.4} rad/s",
        odometry.linear(),
        odometry.angular()
    );

    println!(
        "{:.6} {:.6} {:.6} {:.6} {:.6}",
        pose.x,
        pose.y,
        pose.theta,
        odometry.linear(),
        odometry.angular()
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<RathaConfig> {
    let mut config = match &args.config {
        Some(path) => RathaConfig::load(path)?,
        None => RathaConfig::default(),
    };

    if let Some(layout) = args.layout {
        config.controller.layout = layout;
    }
    if let Some(integration) = args.integration {
        config.odometry.integration = integration;
    }
    if args.open_loop {
        config.controller.open_loop = true;
    }

    config.validate()?;
    Ok(config)
}

/// Ideal wheels: whatever was commanded last tick is measured this tick.
#[derive(Default)]
struct FeedbackSimulator {
    /// Last command, `None` before the first tick.
    command: Option<SteeringCommand>,
    /// Integrated traction positions in rad.
    position: Option<Traction>,
}

impl FeedbackSimulator {
    fn sample(&self, position_feedback: bool) -> Option<WheelSample> {
        let command = self.command?;
        let traction = if position_feedback {
            self.position?
        } else {
            command.traction
        };

        Some(WheelSample {
            traction,
            steering: Steering::Common(command.steering_angle),
        })
    }

    fn apply(&mut self, command: &SteeringCommand, dt: f64) {
        let position = self
            .position
            .and_then(|position| position.zip_with(command.traction, |p, rate| p + rate * dt))
            .unwrap_or_else(|| command.traction.map(|_| 0.0));
        self.position = Some(position);
        self.command = Some(*command);
    }
}
