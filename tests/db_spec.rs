use chrono::NaiveDate;
use roomledger::db::Database;
use roomledger::models::*;
use speculate2::speculate;
use uuid::Uuid;

fn room_input(number: i64, floor: i64) -> CreateRoomInput {
    CreateRoomInput {
        room_number: number,
        floor,
        has_kitchen: false,
        has_ac: false,
        rent: None,
        bed_type: None,
    }
}

fn create_room(db: &Database, number: i64, floor: i64) -> Room {
    db.create_room(room_input(number, floor))
        .expect("Failed to create room")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn create_guest(db: &Database, name: &str, age: i64, occupied: Option<NaiveDate>) -> Guest {
    db.create_guest(CreateGuestInput {
        name: name.to_string(),
        age,
        phone_number: Some("555-0100".to_string()),
        date_of_occupancy: occupied,
        room_id: None,
    })
    .expect("Failed to create guest")
    .expect("Guest without room should always be created")
}

fn create_contract(db: &Database, input: CreateContractInput) -> RentalContract {
    db.create_contract(input)
        .expect("Failed to create contract")
        .expect("Referenced records should exist")
}

fn transaction_input(contract: &RentalContract, kind: TransactionType, amount: i64) -> CreateTransactionInput {
    CreateTransactionInput {
        contract_id: contract.id,
        room_id: None,
        guest_id: None,
        transaction_date: None,
        transaction_type: kind,
        notes: None,
        amount,
    }
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "rooms" {
        describe "create_room" {
            it "creates an available room with no guests" {
                let room = db.create_room(CreateRoomInput {
                    room_number: 204,
                    floor: 2,
                    has_kitchen: true,
                    has_ac: true,
                    rent: Some(7500),
                    bed_type: Some(BedType::Triple),
                }).expect("Failed to create room");

                assert_eq!(room.room_number, 204);
                assert!(room.is_available);
                assert!(room.guests.is_empty());

                let stored = db.get_room(room.id).expect("Query failed").unwrap();
                assert_eq!(stored.floor, 2);
                assert!(stored.has_kitchen);
                assert_eq!(stored.rent, Some(7500));
                assert_eq!(stored.bed_type, Some(BedType::Triple));
            }
        }

        describe "get_room" {
            it "returns None for non-existent room" {
                assert!(db.get_room(Uuid::new_v4()).expect("Query failed").is_none());
            }
        }

        describe "get_rooms" {
            it "returns empty list when no rooms exist" {
                assert!(db.get_rooms(None).expect("Query failed").is_empty());
            }

            it "orders rooms by floor then number" {
                create_room(&db, 301, 3);
                create_room(&db, 102, 1);
                create_room(&db, 101, 1);

                let numbers: Vec<i64> = db.get_rooms(None).expect("Query failed")
                    .into_iter()
                    .map(|r| r.room_number)
                    .collect();
                assert_eq!(numbers, vec![101, 102, 301]);
            }

            it "filters by availability" {
                let occupied = create_room(&db, 101, 1);
                create_room(&db, 102, 1);
                db.add_guest_to_room(occupied.id, CreateGuestInput {
                    name: "Alice".to_string(),
                    age: 25,
                    phone_number: None,
                    date_of_occupancy: None,
                    room_id: None,
                }).expect("Failed to add guest");

                let available = db.get_rooms(Some(true)).expect("Query failed");
                assert_eq!(available.len(), 1);
                assert_eq!(available[0].room_number, 102);

                let taken = db.get_rooms(Some(false)).expect("Query failed");
                assert_eq!(taken.len(), 1);
                assert_eq!(taken[0].guest_names(), vec!["Alice"]);
            }
        }

        describe "list_room_summaries" {
            it "projects guest names per room" {
                let room = create_room(&db, 101, 1);
                create_room(&db, 102, 1);
                let alice = create_guest(&db, "Alice", 25, None);
                db.assign_guest(room.id, alice.id).expect("Failed to assign");

                let summaries = db.list_room_summaries(None).expect("Query failed");
                assert_eq!(summaries.len(), 2);
                assert_eq!(summaries[0].guest_names, vec!["Alice"]);
                assert!(!summaries[0].is_available);
                assert!(summaries[1].guest_names.is_empty());
                assert!(summaries[1].is_available);
            }
        }
    }

    describe "guests" {
        describe "get_all_guests" {
            it "returns guests ordered by name" {
                create_guest(&db, "Zed", 50, None);
                create_guest(&db, "Alice", 25, None);

                let guests = db.get_all_guests().expect("Query failed");
                assert_eq!(guests.len(), 2);
                assert_eq!(guests[0].name, "Alice");
                assert_eq!(guests[1].name, "Zed");
            }
        }

        describe "list_guest_summaries" {
            it "includes room location for assigned guests" {
                let room = create_room(&db, 305, 3);
                let alice = create_guest(&db, "Alice", 25, Some(date(2024, 3, 1)));
                create_guest(&db, "Bob", 30, None);
                db.assign_guest(room.id, alice.id).expect("Failed to assign");

                let guests = db.list_guest_summaries().expect("Query failed");
                assert_eq!(guests.len(), 2);

                assert_eq!(guests[0].name, "Alice");
                assert_eq!(guests[0].room_id, Some(room.id));
                assert_eq!(guests[0].room_number, Some(305));
                assert_eq!(guests[0].floor, Some(3));
                assert_eq!(guests[0].phone_number.as_deref(), Some("555-0100"));
                assert_eq!(guests[0].date_of_occupancy, Some(date(2024, 3, 1)));

                assert_eq!(guests[1].name, "Bob");
                assert!(guests[1].room_id.is_none());
                assert!(guests[1].room_number.is_none());
            }

            it "returns empty list when no guests exist" {
                assert!(db.list_guest_summaries().expect("Query failed").is_empty());
            }
        }

        describe "find_guests_by_age_between" {
            it "includes both bounds" {
                create_guest(&db, "Young", 19, None);
                create_guest(&db, "Low", 20, None);
                create_guest(&db, "Mid", 25, None);
                create_guest(&db, "High", 30, None);
                create_guest(&db, "Old", 31, None);

                let names: Vec<String> = db.find_guests_by_age_between(20, 30)
                    .expect("Query failed")
                    .into_iter()
                    .map(|g| g.name)
                    .collect();
                assert_eq!(names, vec!["High", "Low", "Mid"]);
            }

            it "returns empty for an inverted range" {
                create_guest(&db, "Alice", 25, None);
                assert!(db.find_guests_by_age_between(30, 20).expect("Query failed").is_empty());
            }
        }

        describe "find_guests_by_occupancy_between" {
            it "includes both bounds and skips guests without a date" {
                create_guest(&db, "Before", 30, Some(date(2024, 1, 31)));
                create_guest(&db, "Start", 30, Some(date(2024, 2, 1)));
                create_guest(&db, "End", 30, Some(date(2024, 2, 29)));
                create_guest(&db, "After", 30, Some(date(2024, 3, 1)));
                create_guest(&db, "Undated", 30, None);

                let names: Vec<String> = db
                    .find_guests_by_occupancy_between(date(2024, 2, 1), date(2024, 2, 29))
                    .expect("Query failed")
                    .into_iter()
                    .map(|g| g.name)
                    .collect();
                assert_eq!(names, vec!["Start", "End"]);
            }

            it "returns empty for an inverted range" {
                create_guest(&db, "Alice", 25, Some(date(2024, 2, 10)));
                let guests = db
                    .find_guests_by_occupancy_between(date(2024, 3, 1), date(2024, 2, 1))
                    .expect("Query failed");
                assert!(guests.is_empty());
            }
        }
    }

    describe "rental_contracts" {
        describe "create_contract" {
            it "snapshots room number and guest name from live records" {
                let room = create_room(&db, 101, 1);
                let guest = create_guest(&db, "Alice", 25, None);

                let contract = create_contract(&db, CreateContractInput {
                    room_id: Some(room.id),
                    guest_id: Some(guest.id),
                    advance_amount_paid: Some(10000),
                    rent_due_date: Some(date(2024, 4, 5)),
                    monthly_rent_amount: Some(5000.0),
                    ..Default::default()
                });

                assert_eq!(contract.room_number, Some(101));
                assert_eq!(contract.guest_name.as_deref(), Some("Alice"));

                let stored = db.get_contract(contract.id).expect("Query failed").unwrap();
                assert_eq!(stored.room_number, Some(101));
                assert_eq!(stored.rent_due_date, Some(date(2024, 4, 5)));
                assert_eq!(stored.monthly_rent_amount, Some(5000.0));
            }

            it "keeps explicitly supplied snapshot values" {
                let guest = create_guest(&db, "Alice", 25, None);
                let contract = create_contract(&db, CreateContractInput {
                    guest_id: Some(guest.id),
                    guest_name: Some("Alice Smith".to_string()),
                    room_number: Some(999),
                    ..Default::default()
                });

                assert_eq!(contract.guest_name.as_deref(), Some("Alice Smith"));
                assert_eq!(contract.room_number, Some(999));
                assert!(contract.room_id.is_none());
            }

            it "returns None for a missing room" {
                let result = db.create_contract(CreateContractInput {
                    room_id: Some(Uuid::new_v4()),
                    ..Default::default()
                }).expect("Query failed");

                assert!(result.is_none());
                assert!(db.get_all_contracts().expect("Query failed").is_empty());
            }
        }

        describe "snapshots" {
            it "are not re-synced when the guest and room go away" {
                let room = create_room(&db, 101, 1);
                let guest = create_guest(&db, "Alice", 25, None);
                db.assign_guest(room.id, guest.id).expect("Failed to assign");
                let contract = create_contract(&db, CreateContractInput {
                    room_id: Some(room.id),
                    guest_id: Some(guest.id),
                    ..Default::default()
                });

                db.remove_guest(guest.id).expect("Failed to remove guest");
                db.remove_room(room.id).expect("Failed to remove room");

                let stored = db.get_contract(contract.id).expect("Query failed").unwrap();
                assert!(stored.room_id.is_none());
                assert!(stored.guest_id.is_none());
                assert_eq!(stored.room_number, Some(101));
                assert_eq!(stored.guest_name.as_deref(), Some("Alice"));
            }
        }

        describe "delete_contract" {
            it "deletes the contract and cascades to its transactions" {
                let contract = create_contract(&db, CreateContractInput::default());
                let other = create_contract(&db, CreateContractInput::default());
                db.create_transaction(transaction_input(&contract, TransactionType::Rent, 5000))
                    .expect("Failed to create transaction");
                db.create_transaction(transaction_input(&other, TransactionType::Rent, 4000))
                    .expect("Failed to create transaction");

                assert!(db.delete_contract(contract.id).expect("Failed to delete"));

                assert!(db.get_contract(contract.id).expect("Query failed").is_none());
                assert!(db.get_transactions_by_contract(contract.id).expect("Query failed").is_none());
                let remaining = db.get_transactions_by_contract(other.id)
                    .expect("Query failed")
                    .expect("Contract should exist");
                assert_eq!(remaining.len(), 1);
            }

            it "returns false for a missing contract" {
                assert!(!db.delete_contract(Uuid::new_v4()).expect("Failed to delete"));
            }
        }
    }

    describe "payment_transactions" {
        describe "create_transaction" {
            it "inherits room and guest from the contract and defaults the date" {
                let room = create_room(&db, 101, 1);
                let guest = create_guest(&db, "Alice", 25, None);
                let contract = create_contract(&db, CreateContractInput {
                    room_id: Some(room.id),
                    guest_id: Some(guest.id),
                    ..Default::default()
                });

                let tx = db.create_transaction(CreateTransactionInput {
                    notes: Some("March".to_string()),
                    ..transaction_input(&contract, TransactionType::Advance, 10000)
                })
                .expect("Failed to create transaction")
                .expect("Contract should exist");

                assert_eq!(tx.contract_id, contract.id);
                assert_eq!(tx.room_id, Some(room.id));
                assert_eq!(tx.guest_id, Some(guest.id));
                assert_eq!(tx.transaction_type, TransactionType::Advance);
                assert_eq!(tx.transaction_date, chrono::Utc::now().date_naive());
            }

            it "returns None for a missing contract" {
                let result = db.create_transaction(CreateTransactionInput {
                    contract_id: Uuid::new_v4(),
                    room_id: None,
                    guest_id: None,
                    transaction_date: None,
                    transaction_type: TransactionType::Rent,
                    notes: None,
                    amount: 100,
                }).expect("Query failed");

                assert!(result.is_none());
            }

            it "returns None for an explicit room that does not exist" {
                let contract = create_contract(&db, CreateContractInput::default());
                let result = db.create_transaction(CreateTransactionInput {
                    room_id: Some(Uuid::new_v4()),
                    ..transaction_input(&contract, TransactionType::Utility, 300)
                }).expect("Query failed");

                assert!(result.is_none());
            }

            it "leaves the contract unchanged" {
                let contract = create_contract(&db, CreateContractInput {
                    room_number: Some(101),
                    monthly_rent_amount: Some(5000.0),
                    ..Default::default()
                });

                db.create_transaction(transaction_input(&contract, TransactionType::Rent, 5000))
                    .expect("Failed to create transaction");

                let stored = db.get_contract(contract.id).expect("Query failed").unwrap();
                assert_eq!(stored.room_number, Some(101));
                assert_eq!(stored.monthly_rent_amount, Some(5000.0));
            }
        }

        describe "get_contract_with_transactions" {
            it "orders transactions by date" {
                let contract = create_contract(&db, CreateContractInput::default());
                db.create_transaction(CreateTransactionInput {
                    transaction_date: Some(date(2024, 3, 5)),
                    ..transaction_input(&contract, TransactionType::Rent, 5000)
                }).expect("Failed to create transaction");
                db.create_transaction(CreateTransactionInput {
                    transaction_date: Some(date(2024, 2, 5)),
                    ..transaction_input(&contract, TransactionType::Advance, 10000)
                }).expect("Failed to create transaction");

                let full = db.get_contract_with_transactions(contract.id)
                    .expect("Query failed")
                    .expect("Contract should exist");
                assert_eq!(full.transactions.len(), 2);
                assert_eq!(full.transactions[0].transaction_type, TransactionType::Advance);
                assert_eq!(full.transactions[1].transaction_date, date(2024, 3, 5));
            }
        }

        describe "guest removal" {
            it "clears the reporting reference but keeps the transaction" {
                let guest = create_guest(&db, "Alice", 25, None);
                let contract = create_contract(&db, CreateContractInput {
                    guest_id: Some(guest.id),
                    ..Default::default()
                });
                let tx = db.create_transaction(transaction_input(&contract, TransactionType::Rent, 5000))
                    .expect("Failed to create transaction")
                    .expect("Contract should exist");
                assert_eq!(tx.guest_id, Some(guest.id));

                db.remove_guest(guest.id).expect("Failed to remove");

                let transactions = db.get_transactions_by_contract(contract.id)
                    .expect("Query failed")
                    .expect("Contract should exist");
                assert_eq!(transactions.len(), 1);
                assert!(transactions[0].guest_id.is_none());
            }
        }

        describe "room removal" {
            it "clears the room reference but keeps the transaction and contract" {
                let room = create_room(&db, 204, 2);
                let contract = create_contract(&db, CreateContractInput {
                    room_id: Some(room.id),
                    ..Default::default()
                });
                let tx = db.create_transaction(transaction_input(&contract, TransactionType::Rent, 6000))
                    .expect("Failed to create transaction")
                    .expect("Contract should exist");
                assert_eq!(tx.room_id, Some(room.id));

                assert!(db.remove_room(room.id).expect("Failed to remove room"));

                let transactions = db.get_transactions_by_contract(contract.id)
                    .expect("Query failed")
                    .expect("Contract should exist");
                assert_eq!(transactions.len(), 1);
                assert_eq!(transactions[0].id, tx.id);
                assert!(transactions[0].room_id.is_none());
                assert_eq!(transactions[0].amount, 6000);

                let stored = db.get_contract(contract.id).expect("Query failed").unwrap();
                assert!(stored.room_id.is_none());
                assert_eq!(stored.room_number, Some(204));
            }
        }
    }
}
