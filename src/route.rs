//! Road maps between cities, searched with a per-city heuristic table.
//!
//! The heuristic table is supplied by the caller and is not checked for
//! admissibility. With an overestimating table the route found is not
//! necessarily the shortest one; the built-in Mindanao table is such a case.

use std::{collections::BTreeMap, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    search::{Cost, Neighbors, SearchProblem},
    Error, Result,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMap {
    /// Road distance from each city to its neighbors.
    #[serde(default)]
    roads: BTreeMap<String, BTreeMap<String, Cost>>,
    /// Estimated distance from each city to the destination.
    heuristic: BTreeMap<String, Cost>,
}

impl RouteMap {
    /// Build a map, failing if any city named in `roads` has no entry in
    /// `heuristic`.
    pub fn new(
        roads: BTreeMap<String, BTreeMap<String, Cost>>,
        heuristic: BTreeMap<String, Cost>,
    ) -> Result<RouteMap> {
        let map = RouteMap { roads, heuristic };
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> Result<()> {
        let missing = self
            .roads
            .iter()
            .flat_map(|(from, to)| std::iter::once(from).chain(to.keys()))
            .find(|city| !self.heuristic.contains_key(*city));

        match missing {
            Some(city) => Err(Error::MissingHeuristic(city.clone())),
            None => Ok(()),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<RouteMap> {
        let map: RouteMap = toml::from_str(s)?;
        map.validate()?;
        Ok(map)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<RouteMap> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Roads and straight-line estimates for eight cities in Mindanao, in
    /// kilometres.
    pub fn mindanao() -> RouteMap {
        const ROADS: &[(&str, &[(&str, Cost)])] = &[
            (
                "Davao City",
                &[("Tagum", 55), ("Malaybalay", 160), ("General Santos", 150)],
            ),
            ("Tagum", &[("Davao City", 55), ("Butuan", 230)]),
            ("Malaybalay", &[("Davao City", 160), ("Cagayan de Oro", 90)]),
            ("General Santos", &[("Davao City", 150)]),
            (
                "Butuan",
                &[("Tagum", 230), ("Cagayan de Oro", 175), ("Surigao", 125)],
            ),
            (
                "Cagayan de Oro",
                &[("Malaybalay", 90), ("Butuan", 175), ("Zamboanga City", 400)],
            ),
            ("Surigao", &[("Butuan", 125)]),
            ("Zamboanga City", &[("Cagayan de Oro", 400)]),
        ];
        const HEURISTIC: &[(&str, Cost)] = &[
            ("Davao City", 200),
            ("Cagayan de Oro", 0),
            ("Tagum", 210),
            ("Malaybalay", 80),
            ("General Santos", 320),
            ("Butuan", 150),
            ("Surigao", 250),
            ("Zamboanga City", 350),
        ];

        RouteMap {
            roads: ROADS
                .iter()
                .map(|(from, to)| {
                    let to = to.iter().map(|(c, d)| (c.to_string(), *d)).collect();
                    (from.to_string(), to)
                })
                .collect(),
            heuristic: HEURISTIC
                .iter()
                .map(|(c, h)| (c.to_string(), *h))
                .collect(),
        }
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.roads
            .keys()
            .chain(self.heuristic.keys())
            .map(String::as_str)
            .sorted()
            .dedup()
    }

    pub fn contains(&self, city: &str) -> bool {
        self.roads.contains_key(city) || self.heuristic.contains_key(city)
    }

    /// Roads leaving `city`; a city with no entry simply has none.
    #[auto_enums::auto_enum(Iterator)]
    pub fn roads_from<'a>(
        &'a self,
        city: &str,
    ) -> impl Iterator<Item = (&'a str, Cost)> + 'a {
        match self.roads.get(city) {
            Some(to) => to.iter().map(|(c, d)| (c.as_str(), *d)),
            None => std::iter::empty(),
        }
    }

    pub fn distance(&self, from: &str, to: &str) -> Option<Cost> {
        self.roads.get(from)?.get(to).copied()
    }

    /// Total road distance along `path`, or `None` if two consecutive
    /// cities are not directly connected.
    pub fn path_cost<S: AsRef<str>>(&self, path: &[S]) -> Option<Cost> {
        path.iter()
            .tuple_windows()
            .map(|(a, b)| self.distance(a.as_ref(), b.as_ref()))
            .sum()
    }

    /// Table lookup; unknown cities estimate 0.
    pub fn estimate(&self, city: &str) -> Cost {
        self.heuristic.get(city).copied().unwrap_or(0)
    }
}

impl SearchProblem for RouteMap {
    type State = String;

    fn neighbors(&self, state: &String) -> Neighbors<String> {
        self.roads_from(state)
            .map(|(c, d)| (c.to_string(), d))
            .collect()
    }

    fn heuristic(&self, state: &String, _goal: &String) -> Cost {
        self.estimate(state)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::search::{solve, SearchOutcome};
    use crate::SearchConfig;
    use pathfinding::directed::dijkstra::dijkstra;

    fn route(map: &RouteMap, from: &str, to: &str) -> SearchOutcome<String> {
        solve(map, &from.to_string(), &to.to_string(), &SearchConfig::new()).0
    }

    #[test]
    fn davao_to_butuan() {
        let map = RouteMap::mindanao();
        let solution = route(&map, "Davao City", "Butuan").solution().unwrap();

        assert_eq!(solution.path, vec!["Davao City", "Tagum", "Butuan"]);
        assert_eq!(solution.cost, 285);
        assert_eq!(map.path_cost(&solution.path), Some(solution.cost));
    }

    #[test]
    fn cost_is_sum_of_edges() {
        let map = RouteMap::mindanao();
        for (from, to) in [
            ("Davao City", "Zamboanga City"),
            ("Surigao", "General Santos"),
            ("General Santos", "Cagayan de Oro"),
        ] {
            let solution = route(&map, from, to).solution().unwrap();
            assert_eq!(solution.path.first().map(String::as_str), Some(from));
            assert_eq!(solution.path.last().map(String::as_str), Some(to));
            assert_eq!(map.path_cost(&solution.path), Some(solution.cost));

            // the table is not admissible, so only a lower bound is certain
            let (_, shortest) = dijkstra(
                &from.to_string(),
                |c| map.neighbors(c),
                |c| c == to,
            )
            .unwrap();
            assert!(solution.cost >= shortest);
        }
    }

    #[test]
    fn unknown_city_has_no_roads() {
        let map = RouteMap::mindanao();
        assert_eq!(map.roads_from("Iligan").count(), 0);
        assert_eq!(route(&map, "Iligan", "Butuan"), SearchOutcome::NoPath);
        assert_eq!(route(&map, "Butuan", "Iligan"), SearchOutcome::NoPath);
    }

    #[test]
    fn neighbors_are_stable() {
        let map = RouteMap::mindanao();
        let city = "Butuan".to_string();
        assert_eq!(map.neighbors(&city), map.neighbors(&city));
        assert_eq!(map.neighbors(&city).len(), 3);
    }

    #[test]
    fn new_checks_destinations() {
        let roads = BTreeMap::from([(
            "A".to_string(),
            BTreeMap::from([("B".to_string(), 3)]),
        )]);
        let heuristic = BTreeMap::from([("A".to_string(), 0)]);

        assert!(matches!(
            RouteMap::new(roads.clone(), heuristic.clone()),
            Err(Error::MissingHeuristic(city)) if city == "B"
        ));

        let mut heuristic = heuristic;
        heuristic.insert("B".to_string(), 0);
        let map = RouteMap::new(roads, heuristic).unwrap();
        assert_eq!(map.distance("A", "B"), Some(3));
        assert_eq!(map.distance("B", "A"), None);
    }

    #[test]
    fn path_cost_rejects_gaps() {
        let map = RouteMap::mindanao();
        assert_eq!(map.path_cost(&["Davao City", "Butuan"]), None);
        assert_eq!(map.path_cost(&["Surigao"]), Some(0));
    }

    #[test]
    fn cities_are_listed_once() {
        let map = RouteMap::mindanao();
        assert_eq!(map.cities().count(), 8);
        assert!(map.contains("Surigao"));
    }

    const SMALL_MAP: &str = r#"
[heuristic]
A = 2
B = 1
C = 0

[roads.A]
B = 1
C = 5

[roads.B]
C = 1
"#;

    #[test]
    fn loads_toml_map() {
        let map = RouteMap::from_toml_str(SMALL_MAP).unwrap();
        let solution = route(&map, "A", "C").solution().unwrap();

        assert_eq!(solution.path, vec!["A", "B", "C"]);
        assert_eq!(solution.cost, 2);
    }

    #[test]
    fn bundled_map_matches_builtin() {
        let map = RouteMap::from_toml_str(include_str!("../demos/mindanao.toml")).unwrap();
        assert_eq!(map, RouteMap::mindanao());
    }

    #[test]
    fn missing_estimate_fails_fast() {
        let text = SMALL_MAP.replace("C = 0\n", "");
        assert!(matches!(
            RouteMap::from_toml_str(&text),
            Err(Error::MissingHeuristic(city)) if city == "C"
        ));
    }

    #[test]
    fn negative_distance_is_rejected() {
        let text = SMALL_MAP.replace("C = 5", "C = -5");
        assert!(matches!(RouteMap::from_toml_str(&text), Err(Error::Toml(_))));
    }
}
