use route_charts::*;
use serde::Serialize;
use std::io::{self, Write};

fn main() {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let mut loader = DataLoader::new(&config.data_dir);
    if let Err(e) = loader.load_all(&config) {
        eprintln!("Error: {}", e);
        return;
    }

    loop {
        println!("Route Charts Console App");
        println!("1. Per-vehicle charts of an algorithm");
        println!("2. Compare algorithms");
        println!("3. Box plots");
        println!("4. Vehicles by depot");
        println!("5. Exit");

        let choice = match prompt("Choose an option: ") {
            Some(choice) => choice,
            None => break,
        };

        match choice.as_str() {
            "1" => {
                let algorithm = prompt("Enter algorithm id: ")
                    .and_then(|id| id.parse::<u32>().ok())
                    .and_then(|id| loader.find_algorithm(id));

                match algorithm {
                    Some(algorithm) => print_vehicle_charts(algorithm),
                    None => eprintln!("Invalid input. Please enter a configured algorithm id."),
                }
            }
            "2" => print_comparison_charts(loader.algorithms()),
            "3" => {
                print_chart("Total distance", total_distance_box_plot_data(loader.run_sets()));
                print_chart("Total time", total_time_box_plot_data(loader.run_sets()));
                print_chart("Total costs", total_costs_box_plot_data(loader.run_sets()));
            }
            "4" => {
                for group in loader.depot_groups() {
                    println!("Depot {}: {} vehicles", group.id, group.vehicles.len());
                    for vehicle in &group.vehicles {
                        println!("  Vehicle {} (capacity {})", vehicle.id, vehicle.capacity);
                    }
                }
            }
            "5" => break,
            _ => println!("Invalid choice, please try again."),
        }
    }
}

fn print_vehicle_charts(algorithm: &Algorithm) {
    print_chart("Distance", distance_data(algorithm));
    print_chart("Stop count", stop_count_data(algorithm));
    print_chart("Cost", cost_data(algorithm));
    print_chart("Packages over time", packages_over_time_data(algorithm));
    print_chart("Distance over time", distance_over_time_data(algorithm));
    print_chart("Cost over time", cost_over_time_data(algorithm));
    print_chart("All packages delivered", all_packages_delivered_data(algorithm));
}

fn print_comparison_charts(algorithms: &[Algorithm]) {
    print_chart("Cost and idle time", cost_and_idle_time_data(algorithms));
    print_chart("Distance and time", distance_and_time_data(algorithms));
    print_chart("Packages over time", packages_over_time_comparison_data(algorithms));
    print_chart("Distance over time", distance_over_time_comparison_data(algorithms));
    print_chart("Cost over time", cost_over_time_comparison_data(algorithms));
}

fn print_chart<T: Serialize>(title: &str, chart: Result<T, ChartError>) {
    match chart.map(|chart| serde_json::to_string_pretty(&chart)) {
        Ok(Ok(json)) => println!("{}:\n{}", title, json),
        Ok(Err(e)) => eprintln!("Error: {}", e),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn prompt(message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}
