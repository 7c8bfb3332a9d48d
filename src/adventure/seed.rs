//! Built-in Kanto starter region used when no world seed file is configured.
//!
//! Operators are free to replace this layout with their own JSON seed; the
//! only hard requirement is that the configured initial location exists.

use crate::adventure::tutorial::conditions;
use crate::adventure::world::{
    CatchRate, Encounter, EncounterMethod, Gym, GymTrainer, ItemReward, ItemType, Location,
    LocationConnection, LocationStore, LocationType, MoveItemReward, Rarity, Species, StoreItem,
    StoreType, TrainerPokemon, TutorialMission, TutorialStep, WorldCatalog,
};

pub const POKE_BALL: u32 = 1;
pub const GREAT_BALL: u32 = 2;
pub const ULTRA_BALL: u32 = 3;
pub const POTION: u32 = 4;

pub const PALLET_TOWN: u32 = 1;
pub const ROUTE_1: u32 = 2;
pub const VIRIDIAN_CITY: u32 = 3;
pub const ROUTE_2: u32 = 4;
pub const PEWTER_CITY: u32 = 5;
pub const ROUTE_3: u32 = 6;
pub const CERULEAN_CAVE: u32 = 7;
pub const DIGLETT_CAVE: u32 = 8;

pub const BOULDER_GYM: u32 = 1;

const COMMON: u32 = 1;
const RARE: u32 = 2;
const LEGENDARY: u32 = 3;

fn item(id: u32, code: &str, name: &str) -> ItemType {
    ItemType {
        id,
        code: code.into(),
        name: name.into(),
    }
}

fn location(id: u32, code: &str, name: &str, location_type_id: u32) -> Location {
    Location {
        id,
        code: code.into(),
        name: name.into(),
        location_type_id,
        enabled: true,
        hidden: false,
    }
}

fn both_ways(a: u32, b: u32) -> [LocationConnection; 2] {
    [
        LocationConnection {
            from_location_id: a,
            to_location_id: b,
            required_gym_id: None,
        },
        LocationConnection {
            from_location_id: b,
            to_location_id: a,
            required_gym_id: None,
        },
    ]
}

fn species(id: u32, code: &str, rarity_id: Option<u32>) -> Species {
    let mut name = code.to_ascii_lowercase();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Species {
        id,
        code: code.into(),
        name,
        starter: false,
        enabled: true,
        rarity_id,
    }
}

fn encounter(location_id: u32, species_id: u32, weight: i32, levels: (u32, u32)) -> Encounter {
    Encounter {
        location_id,
        species_id,
        weight,
        min_level: levels.0,
        max_level: levels.1,
        method: EncounterMethod::Walk,
    }
}

fn mission(id: u32, step_id: u32, code: &str, order: i32, condition: &str) -> TutorialMission {
    TutorialMission {
        id,
        step_id,
        code: code.into(),
        order,
        condition_code: condition.into(),
    }
}

/// Pallet Town to Route 3, with the Pewter gym gating the road east.
pub fn canonical_world() -> WorldCatalog {
    let item_types = vec![
        item(POKE_BALL, "POKE_BALL", "Poké Ball"),
        item(GREAT_BALL, "GREAT_BALL", "Great Ball"),
        item(ULTRA_BALL, "ULTRA_BALL", "Ultra Ball"),
        item(POTION, "POTION", "Potion"),
    ];

    let location_types = vec![
        LocationType {
            id: 1,
            code: "TOWN".into(),
            has_wild_encounters: false,
            has_shop: false,
            has_gym: false,
        },
        LocationType {
            id: 2,
            code: "ROUTE".into(),
            has_wild_encounters: true,
            has_shop: false,
            has_gym: false,
        },
        LocationType {
            id: 3,
            code: "CITY".into(),
            has_wild_encounters: false,
            has_shop: true,
            has_gym: false,
        },
        LocationType {
            id: 4,
            code: "GYM_CITY".into(),
            has_wild_encounters: false,
            has_shop: true,
            has_gym: true,
        },
    ];

    let mut cerulean_cave = location(CERULEAN_CAVE, "CeruleanCave", "Cerulean Cave", 2);
    cerulean_cave.hidden = true;
    let locations = vec![
        location(PALLET_TOWN, "PalletTown", "Pallet Town", 1),
        location(ROUTE_1, "Route1", "Route 1", 2),
        location(VIRIDIAN_CITY, "ViridianCity", "Viridian City", 3),
        location(ROUTE_2, "Route2", "Route 2", 2),
        location(PEWTER_CITY, "PewterCity", "Pewter City", 4),
        location(ROUTE_3, "Route3", "Route 3", 2),
        cerulean_cave,
        location(DIGLETT_CAVE, "DiglettCave", "Diglett's Cave", 2),
    ];

    let mut connections = Vec::new();
    connections.extend(both_ways(PALLET_TOWN, ROUTE_1));
    connections.extend(both_ways(ROUTE_1, VIRIDIAN_CITY));
    connections.extend(both_ways(VIRIDIAN_CITY, ROUTE_2));
    connections.extend(both_ways(ROUTE_2, PEWTER_CITY));
    connections.push(LocationConnection {
        from_location_id: PEWTER_CITY,
        to_location_id: ROUTE_3,
        required_gym_id: Some(BOULDER_GYM),
    });
    connections.push(LocationConnection {
        from_location_id: ROUTE_3,
        to_location_id: PEWTER_CITY,
        required_gym_id: None,
    });
    connections.extend(both_ways(ROUTE_3, DIGLETT_CAVE));

    let gyms = vec![Gym {
        id: BOULDER_GYM,
        code: "BOULDER".into(),
        name: "Pewter Gym".into(),
        location_id: PEWTER_CITY,
        closed: false,
    }];

    let gym_trainers = vec![
        GymTrainer {
            id: 1,
            gym_id: BOULDER_GYM,
            order: 1,
            name: "Camper Liam".into(),
            pokemon: vec![TrainerPokemon {
                species_id: 74,
                level: 10,
            }],
            money_reward: 100,
            item_reward: None,
        },
        GymTrainer {
            id: 2,
            gym_id: BOULDER_GYM,
            order: 2,
            name: "Hiker Marcos".into(),
            pokemon: vec![
                TrainerPokemon {
                    species_id: 74,
                    level: 11,
                },
                TrainerPokemon {
                    species_id: 74,
                    level: 12,
                },
            ],
            money_reward: 150,
            item_reward: Some(ItemReward {
                item_type_id: POTION,
                quantity: 2,
            }),
        },
        GymTrainer {
            id: 3,
            gym_id: BOULDER_GYM,
            order: 3,
            name: "Brock".into(),
            pokemon: vec![
                TrainerPokemon {
                    species_id: 74,
                    level: 12,
                },
                TrainerPokemon {
                    species_id: 95,
                    level: 14,
                },
            ],
            money_reward: 500,
            item_reward: Some(ItemReward {
                item_type_id: GREAT_BALL,
                quantity: 1,
            }),
        },
    ];

    let rarities = vec![
        Rarity {
            id: COMMON,
            code: "COMMON".into(),
            min_money_reward: 10,
            max_money_reward: 30,
        },
        Rarity {
            id: RARE,
            code: "RARE".into(),
            min_money_reward: 30,
            max_money_reward: 80,
        },
        Rarity {
            id: LEGENDARY,
            code: "LEGENDARY".into(),
            min_money_reward: 200,
            max_money_reward: 500,
        },
    ];

    let mut catch_rates = Vec::new();
    for (rarity_id, rates) in [
        (COMMON, [60, 80, 95]),
        (RARE, [30, 50, 70]),
        (LEGENDARY, [5, 10, 20]),
    ] {
        for (tool, percent) in ["POKE_BALL", "GREAT_BALL", "ULTRA_BALL"].iter().zip(rates) {
            catch_rates.push(CatchRate {
                rarity_id,
                tool_code: (*tool).into(),
                percent,
            });
        }
    }

    let mut species_list = vec![
        species(1, "BULBASAUR", Some(RARE)),
        species(4, "CHARMANDER", Some(RARE)),
        species(7, "SQUIRTLE", Some(RARE)),
        species(10, "CATERPIE", Some(COMMON)),
        species(16, "PIDGEY", Some(COMMON)),
        species(19, "RATTATA", Some(COMMON)),
        species(21, "SPEAROW", Some(COMMON)),
        species(25, "PIKACHU", Some(RARE)),
        species(35, "CLEFAIRY", Some(RARE)),
        species(39, "JIGGLYPUFF", None),
        species(74, "GEODUDE", Some(COMMON)),
        species(95, "ONIX", Some(RARE)),
        species(150, "MEWTWO", Some(LEGENDARY)),
    ];
    for s in species_list.iter_mut() {
        match s.id {
            1 | 4 | 7 => s.starter = true,
            150 => s.enabled = false,
            _ => {}
        }
    }

    let encounters = vec![
        encounter(ROUTE_1, 16, 60, (2, 4)),
        encounter(ROUTE_1, 19, 40, (2, 4)),
        encounter(ROUTE_2, 10, 50, (3, 5)),
        encounter(ROUTE_2, 16, 30, (3, 5)),
        encounter(ROUTE_2, 25, 5, (4, 6)),
        encounter(ROUTE_2, 150, 10, (70, 70)),
        encounter(ROUTE_3, 21, 40, (6, 8)),
        encounter(ROUTE_3, 39, 20, (5, 7)),
        encounter(ROUTE_3, 35, 5, (8, 10)),
        encounter(ROUTE_3, 74, 35, (6, 9)),
        encounter(CERULEAN_CAVE, 150, 1, (70, 70)),
    ];

    let move_item_rewards = vec![
        MoveItemReward {
            item_type_id: POKE_BALL,
            weight: 70,
            min_quantity: 1,
            max_quantity: 2,
        },
        MoveItemReward {
            item_type_id: POTION,
            weight: 25,
            min_quantity: 1,
            max_quantity: 1,
        },
        MoveItemReward {
            item_type_id: GREAT_BALL,
            weight: 5,
            min_quantity: 1,
            max_quantity: 1,
        },
    ];

    let store_types = vec![StoreType {
        id: 1,
        code: "POKE_MART".into(),
        name: "Poké Mart".into(),
    }];
    let store_items = [
        (1, POKE_BALL, 200, true),
        (2, GREAT_BALL, 600, true),
        (3, POTION, 300, true),
        (4, ULTRA_BALL, 1200, false),
    ]
    .into_iter()
    .map(|(id, item_type_id, price, enabled)| StoreItem {
        id,
        store_type_id: 1,
        item_type_id,
        price,
        enabled,
        sort_order: id as i32,
    })
    .collect();
    let location_stores = vec![
        LocationStore {
            location_id: VIRIDIAN_CITY,
            store_type_id: 1,
            sort_order: 0,
        },
        LocationStore {
            location_id: PEWTER_CITY,
            store_type_id: 1,
            sort_order: 0,
        },
    ];

    let tutorial_steps = vec![
        TutorialStep {
            id: 1,
            code: "FIRST_STEPS".into(),
            order: 1,
            reward_money: 500,
            reward_item: Some(ItemReward {
                item_type_id: POKE_BALL,
                quantity: 5,
            }),
        },
        TutorialStep {
            id: 2,
            code: "COLLECTOR".into(),
            order: 2,
            reward_money: 300,
            reward_item: Some(ItemReward {
                item_type_id: GREAT_BALL,
                quantity: 1,
            }),
        },
        TutorialStep {
            id: 3,
            code: "CHALLENGER".into(),
            order: 3,
            reward_money: 1000,
            reward_item: None,
        },
    ];
    let tutorial_missions = vec![
        mission(1, 1, "TAKE_A_WALK", 1, conditions::MOVE_ONCE),
        mission(2, 1, "MEET_WILD", 2, conditions::ENCOUNTER_ONCE),
        mission(3, 2, "FIRST_CATCH", 1, conditions::CATCH_ONCE),
        mission(4, 2, "GO_SHOPPING", 2, conditions::SHOP_BUY_ONCE),
        mission(5, 2, "CHECK_DEX", 3, conditions::POKEDEX_5_AND_CMD),
        mission(6, 3, "FIRST_GYM_WIN", 1, conditions::GYM_TRAINER_DEFEATED),
        mission(7, 3, "BOULDER_BADGE", 2, conditions::BADGE_OBTAINED),
    ];

    WorldCatalog {
        item_types,
        location_types,
        locations,
        connections,
        gyms,
        gym_trainers,
        rarities,
        catch_rates,
        species: species_list,
        encounters,
        move_item_rewards,
        store_types,
        store_items,
        location_stores,
        tutorial_steps,
        tutorial_missions,
    }
}
