use clap::{Parser, Subcommand};
use sewer_route::read_route_csv;
use side_view::{
    io::{read_chainages, read_profile_csv, write_profile_csv},
    levels::replace_no_data_with_bed_level,
    range::profiles_range,
    settings::{read_settings_json, SideViewSettings},
    Profile,
};

/// Command line tools for side view profiles along a network route.
#[derive(Parser)]
#[command(name = "side_view_cli", version)]
struct Cli {
    /// JSON file with side view settings
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add points around structures to a chainage,value profile.
    Densify {
        profile: String,
        /// File with structure chainages
        structures: String,
        output: String,
        /// Distance between a structure and its extra points
        #[arg(long)]
        offset: Option<f64>,
    },
    /// Print the interpolated profile value at a chainage.
    #[command(allow_negative_numbers = true)]
    Evaluate { profile: String, chainage: f64 },
    /// Print the vertical chart range covering all given profiles.
    Range {
        #[arg(required = true)]
        profiles: Vec<String>,
    },
    /// Replace missing levels with the bed level at the same chainage.
    FillNoData {
        levels: String,
        bed: String,
        output: String,
        #[arg(long, allow_negative_numbers = true)]
        no_data: Option<f64>,
    },
    /// Write pipe top and bottom profiles along a sewer route.
    PipeProfile {
        pipes: String,
        segments: String,
        top: String,
        bottom: String,
    },
    /// Print the pipe and pipe chainage at a route offset.
    #[command(allow_negative_numbers = true)]
    Locate {
        pipes: String,
        segments: String,
        offset: f64,
    },
    /// Print the nodes passed along a sewer route.
    Nodes { pipes: String, segments: String },
    /// Write a route water level limited to the pipes it runs through.
    WaterInPipe {
        pipes: String,
        segments: String,
        /// Water level profile over route offsets
        water_level: String,
        output: String,
    },
}

fn profile_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

fn read_profile(path: &str, settings: &SideViewSettings) -> std::io::Result<Profile> {
    let mut profile = read_profile_csv(path, &profile_name(path), &settings.value_unit)?;
    profile.no_data_value = settings.no_data_value;
    Ok(profile)
}

fn write_profile(path: &str, profile: &Profile) {
    match write_profile_csv(path, profile) {
        Ok(()) => println!("Wrote {}", path),
        Err(e) => eprintln!("Error writing {}: {}", path, e),
    }
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();

    let settings = match cli.settings.as_deref() {
        Some(path) => match read_settings_json(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                return;
            }
        },
        None => SideViewSettings::default(),
    };
    log::debug!("using {:?}", settings);

    match cli.command {
        Commands::Densify {
            profile,
            structures,
            output,
            offset,
        } => match (read_profile(&profile, &settings), read_chainages(&structures)) {
            (Ok(p), Ok(s)) => {
                let offset = offset.unwrap_or(settings.structure_offset);
                match p.with_structures(&s, offset) {
                    Ok(dense) => write_profile(&output, &dense),
                    Err(e) => eprintln!("Error densifying {}: {}", profile, e),
                }
            }
            (Err(e), _) => eprintln!("Error reading {}: {}", profile, e),
            (_, Err(e)) => eprintln!("Error reading {}: {}", structures, e),
        },
        Commands::Evaluate { profile, chainage } => match read_profile(&profile, &settings) {
            Ok(p) => println!("{:.3},{:.3}", chainage, p.evaluate(chainage)),
            Err(e) => eprintln!("Error reading {}: {}", profile, e),
        },
        Commands::Range { profiles } => {
            let mut loaded = Vec::new();
            for path in &profiles {
                match read_profile(path, &settings) {
                    Ok(p) => loaded.push(p),
                    Err(e) => {
                        eprintln!("Error reading {}: {}", path, e);
                        return;
                    }
                }
            }
            match profiles_range(&loaded) {
                Some((min, max)) => println!("{:.3},{:.3}", min, max),
                None => eprintln!("No valid values in {}", profiles.join(", ")),
            }
        }
        Commands::FillNoData {
            levels,
            bed,
            output,
            no_data,
        } => match (read_profile(&levels, &settings), read_profile(&bed, &settings)) {
            (Ok(mut l), Ok(b)) => {
                let no_data = no_data.or(settings.no_data_value);
                match replace_no_data_with_bed_level(&mut l.values, &l.chainages, no_data, &b) {
                    Ok(n) => {
                        println!("Replaced {} values", n);
                        write_profile(&output, &l);
                    }
                    Err(e) => eprintln!("Error filling {}: {}", levels, e),
                }
            }
            (Err(e), _) => eprintln!("Error reading {}: {}", levels, e),
            (_, Err(e)) => eprintln!("Error reading {}: {}", bed, e),
        },
        Commands::PipeProfile {
            pipes,
            segments,
            top,
            bottom,
        } => match read_route_csv(&pipes, &segments) {
            Ok(route) => match route.pipe_profiles() {
                Ok((t, b)) => {
                    write_profile(&top, &t);
                    write_profile(&bottom, &b);
                }
                Err(e) => eprintln!("Error building pipe profiles: {}", e),
            },
            Err(e) => eprintln!("Error reading route: {}", e),
        },
        Commands::Locate {
            pipes,
            segments,
            offset,
        } => match read_route_csv(&pipes, &segments) {
            Ok(route) => match route.locate(offset) {
                Some((i, chainage)) => println!("{},{:.3}", route.segments[i].pipe, chainage),
                None => eprintln!("Offset {:.3} is outside the route", offset),
            },
            Err(e) => eprintln!("Error reading route: {}", e),
        },
        Commands::Nodes { pipes, segments } => match read_route_csv(&pipes, &segments) {
            Ok(route) => match route.node_chainages() {
                Ok(nodes) => {
                    for (node, offset) in nodes {
                        println!("{},{:.3}", node, offset);
                    }
                }
                Err(e) => eprintln!("Error building nodes: {}", e),
            },
            Err(e) => eprintln!("Error reading route: {}", e),
        },
        Commands::WaterInPipe {
            pipes,
            segments,
            water_level,
            output,
        } => match (read_route_csv(&pipes, &segments), read_profile(&water_level, &settings)) {
            (Ok(route), Ok(wl)) => match route.water_level_in_pipe(&wl) {
                Ok(in_pipe) => write_profile(&output, &in_pipe),
                Err(e) => eprintln!("Error building water level in pipe: {}", e),
            },
            (Err(e), _) => eprintln!("Error reading route: {}", e),
            (_, Err(e)) => eprintln!("Error reading {}: {}", water_level, e),
        },
    }
}
