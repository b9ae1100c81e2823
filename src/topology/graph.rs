use crate::network::{BaseStation, StationId};
use std::collections::VecDeque;
use tracing::debug;

/// Link every pair of same-radio stations closer than `range_m`. Previous
/// adjacency is discarded. Returns the number of edges.
pub fn build_adjacency(stations: &mut [BaseStation], range_m: f64) -> usize {
    for station in stations.iter_mut() {
        station.clear_neighbours();
    }

    let mut edges = Vec::new();
    for i in 0..stations.len() {
        for j in (i + 1)..stations.len() {
            let (a, b) = (&stations[i], &stations[j]);
            if a.radio != b.radio {
                continue;
            }
            if a.position.distance_to(&b.position) < range_m {
                edges.push((i, j));
            }
        }
    }

    for &(i, j) in &edges {
        stations[i].add_neighbour(j);
        stations[j].add_neighbour(i);
    }
    debug!(stations = stations.len(), edges = edges.len(), "Built station adjacency");
    edges.len()
}

/// Read-only traversal of the station adjacency graph
#[derive(Debug, Clone, Copy)]
pub struct TopologyAnalyzer<'a> {
    stations: &'a [BaseStation],
}

impl<'a> TopologyAnalyzer<'a> {
    pub fn new(stations: &'a [BaseStation]) -> Self {
        Self { stations }
    }

    /// Connected components, each listed in visiting order. Components are
    /// ordered by their lowest station id.
    pub fn components(&self) -> Vec<Vec<StationId>> {
        let mut visited = vec![false; self.stations.len()];
        let mut components = Vec::new();
        let mut frontier = VecDeque::new();

        for start in 0..self.stations.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            frontier.push_back(start);
            let mut component = Vec::new();

            while let Some(current) = frontier.pop_front() {
                component.push(current);
                for &next in self.stations[current].neighbours() {
                    if next < visited.len() && !visited[next] {
                        visited[next] = true;
                        frontier.push_back(next);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Number of isolated systems (connected components)
    pub fn isolated_systems(&self) -> usize {
        self.components().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::GeoPoint;
    use crate::radio::RadioType;

    fn station(lon: f64, radio: RadioType) -> BaseStation {
        BaseStation::new(0, GeoPoint::new(lon, 52.0), 25.0, radio)
    }

    fn arena(mut stations: Vec<BaseStation>) -> Vec<BaseStation> {
        for (idx, bs) in stations.iter_mut().enumerate() {
            bs.id = idx;
        }
        stations
    }

    #[test]
    fn test_no_edges_counts_every_station() {
        let mut stations = arena(vec![
            station(5.0, RadioType::Lte),
            station(5.1, RadioType::Lte),
            station(5.2, RadioType::Lte),
        ]);
        assert_eq!(build_adjacency(&mut stations, 1_000.0), 0);
        assert_eq!(TopologyAnalyzer::new(&stations).isolated_systems(), 3);
    }

    #[test]
    fn test_fully_connected_is_one_system() {
        let mut stations = arena(vec![
            station(5.0, RadioType::Nr),
            station(5.001, RadioType::Nr),
            station(5.002, RadioType::Nr),
            station(5.003, RadioType::Nr),
        ]);
        assert_eq!(build_adjacency(&mut stations, 10_000.0), 6);
        assert_eq!(TopologyAnalyzer::new(&stations).isolated_systems(), 1);
    }

    #[test]
    fn test_radio_types_never_link() {
        let mut stations = arena(vec![
            station(5.0, RadioType::Lte),
            station(5.0005, RadioType::Nr),
            station(5.001, RadioType::Lte),
        ]);
        assert_eq!(build_adjacency(&mut stations, 1_000.0), 1);
        let analyzer = TopologyAnalyzer::new(&stations);
        assert_eq!(analyzer.components(), vec![vec![0, 2], vec![1]]);
        assert_eq!(stations[1].neighbours().len(), 0);
    }

    #[test]
    fn test_chain_is_transitively_connected() {
        // 0.01 degree of longitude at 52N is ~686 m
        let mut stations = arena(vec![
            station(5.0, RadioType::Lte),
            station(5.01, RadioType::Lte),
            station(5.02, RadioType::Lte),
            station(5.5, RadioType::Lte),
        ]);
        assert_eq!(build_adjacency(&mut stations, 1_000.0), 2);
        let analyzer = TopologyAnalyzer::new(&stations);
        assert_eq!(analyzer.isolated_systems(), 2);
        assert_eq!(analyzer.components()[0], vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_topology() {
        assert_eq!(TopologyAnalyzer::new(&[]).isolated_systems(), 0);
    }

    #[test]
    fn test_rebuild_replaces_edges() {
        let mut stations = arena(vec![station(5.0, RadioType::Lte), station(5.01, RadioType::Lte)]);
        build_adjacency(&mut stations, 1_000.0);
        assert_eq!(stations[0].neighbours(), &[1]);
        build_adjacency(&mut stations, 100.0);
        assert!(stations[0].neighbours().is_empty());
    }
}
