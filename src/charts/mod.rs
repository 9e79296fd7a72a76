pub mod box_plot;
pub mod comparison;
pub mod preprocess;
pub mod vehicle_charts;

pub use box_plot::{box_plot_data, total_costs_box_plot_data, total_distance_box_plot_data, total_time_box_plot_data};
pub use comparison::{
    cost_and_idle_time_data, cost_over_time_comparison_data, distance_and_time_data,
    distance_over_time_comparison_data, idle_time, packages_over_time_comparison_data,
};
pub use preprocess::{
    color_of, compare_by_arrival, incremental_cost, merge_stops, route_of, sort_by_arrival, sorted_deliveries,
    sorted_stops, vehicle_ids,
};
pub use vehicle_charts::{
    all_packages_delivered_data, cost_data, cost_over_time_data, distance_data, distance_over_time_data,
    packages_over_time_data, stop_count_data, vehicle_cost,
};
