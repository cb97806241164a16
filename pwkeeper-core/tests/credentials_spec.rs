mod support;

use speculate2::speculate;

speculate! {
    use pwkeeper_core::db::Database;
    use pwkeeper_core::models::{CreateCredentialInput, Credential};
    use pwkeeper_core::Error;
    use crate::support::setup_db;

    fn add(db: &Database, title: &str, email: &str, secret: &str) -> i64 {
        db.insert_credential(CreateCredentialInput::new(title, email, secret))
            .expect("Failed to insert credential")
    }

    fn titles(credentials: &[Credential]) -> Vec<&str> {
        credentials.iter().map(|c| c.title.as_str()).collect()
    }

    describe "insert" {
        it "makes the record visible in the listing" {
            let db = setup_db();
            let id = add(&db, "Email", "a@b.com", "pw1");

            let all = db.list_credentials().unwrap();
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].id, id);
            assert_eq!(all[0].title, "Email");
            assert_eq!(all[0].email, "a@b.com");
            assert_eq!(all[0].secret, "pw1");
        }

        it "allows an empty email" {
            let db = setup_db();
            add(&db, "Wifi", "", "hunter2");

            let all = db.list_credentials().unwrap();
            assert_eq!(all[0].email, "");
            assert_eq!(all[0].email_display(), "N/A");
        }

        it "rejects an empty title or secret without writing" {
            let db = setup_db();

            let missing_title = db.insert_credential(CreateCredentialInput::new("", "a@b.com", "pw"));
            let missing_secret = db.insert_credential(CreateCredentialInput::new("Bank", "a@b.com", "  "));

            assert!(matches!(missing_title, Err(Error::Validation(_))));
            assert!(matches!(missing_secret, Err(Error::Validation(_))));
            assert!(db.list_credentials().unwrap().is_empty());
        }

        it "permits duplicate titles with distinct ids" {
            let db = setup_db();
            let first = add(&db, "Bank", "", "pw1");
            let second = add(&db, "Bank", "", "pw2");

            assert_ne!(first, second);
            assert_eq!(db.list_credentials().unwrap().len(), 2);
        }
    }

    describe "list_credentials" {
        it "orders records by title" {
            let db = setup_db();
            add(&db, "Email", "a@b.com", "pw1");
            add(&db, "Bank", "x@y.com", "pw2");

            let all = db.list_credentials().unwrap();
            assert_eq!(titles(&all), vec!["Bank", "Email"]);
        }

        it "keeps lexicographic order for any insertion order" {
            let db = setup_db();
            for title in ["delta", "Alpha", "charlie", "Bravo", "alpha"] {
                add(&db, title, "", "pw");
            }

            let all = db.list_credentials().unwrap();
            let mut expected = titles(&all);
            expected.sort();
            assert_eq!(titles(&all), expected);
        }

        it "returns empty list when no records exist" {
            let db = setup_db();
            assert!(db.list_credentials().unwrap().is_empty());
        }
    }

    describe "search_credentials" {
        it "returns titles containing the query in title order" {
            let db = setup_db();
            add(&db, "Work mail", "", "pw");
            add(&db, "Bank", "", "pw");
            add(&db, "Home mail", "", "pw");

            let found = db.search_credentials("mail").unwrap();
            assert_eq!(titles(&found), vec!["Home mail", "Work mail"]);
        }

        it "returns everything for an empty query" {
            let db = setup_db();
            add(&db, "Email", "", "pw");
            add(&db, "Bank", "", "pw");

            let found = db.search_credentials("").unwrap();
            assert_eq!(found, db.list_credentials().unwrap());
        }

        it "matches the subset of the listing containing the query" {
            let db = setup_db();
            for title in ["github", "gitlab", "bitbucket", "google", "git"] {
                add(&db, title, "", "pw");
            }

            let expected: Vec<Credential> = db
                .list_credentials()
                .unwrap()
                .into_iter()
                .filter(|c| c.title.contains("it"))
                .collect();

            assert_eq!(db.search_credentials("it").unwrap(), expected);
        }

        it "treats LIKE wildcards literally" {
            let db = setup_db();
            add(&db, "50% off", "", "pw");
            add(&db, "500 off", "", "pw");
            add(&db, "a_b", "", "pw");
            add(&db, "axb", "", "pw");

            assert_eq!(titles(&db.search_credentials("%").unwrap()), vec!["50% off"]);
            assert_eq!(titles(&db.search_credentials("_").unwrap()), vec!["a_b"]);
        }

        it "ignores ASCII case like the store collation" {
            let db = setup_db();
            add(&db, "Bank", "", "pw");

            assert_eq!(titles(&db.search_credentials("bank").unwrap()), vec!["Bank"]);
        }

        it "returns empty list when nothing matches" {
            let db = setup_db();
            add(&db, "Bank", "", "pw");

            assert!(db.search_credentials("zzz").unwrap().is_empty());
        }
    }

    describe "delete_credentials_by_title" {
        it "removes every record with that title and nothing else" {
            let db = setup_db();
            add(&db, "Bank", "", "pw1");
            add(&db, "Bank", "", "pw2");
            add(&db, "Bank account", "", "pw3");

            let removed = db.delete_credentials_by_title("Bank").unwrap();

            assert_eq!(removed, 2);
            assert_eq!(titles(&db.list_credentials().unwrap()), vec!["Bank account"]);
        }

        it "is a no-op for a nonexistent title" {
            let db = setup_db();
            add(&db, "Bank", "", "pw");

            assert_eq!(db.delete_credentials_by_title("Nope").unwrap(), 0);
            assert_eq!(db.list_credentials().unwrap().len(), 1);
        }
    }

    describe "delete_credential" {
        it "removes only the record with that id" {
            let db = setup_db();
            let keep = add(&db, "Bank", "", "pw1");
            let doomed = add(&db, "Bank", "", "pw2");

            assert!(db.delete_credential(doomed).unwrap());

            let all = db.list_credentials().unwrap();
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].id, keep);
        }

        it "returns false for an unknown id" {
            let db = setup_db();
            assert!(!db.delete_credential(42).unwrap());
        }
    }

    describe "get_credential" {
        it "finds a record by id" {
            let db = setup_db();
            let id = add(&db, "Bank", "x@y.com", "pw2");

            let found = db.get_credential(id).unwrap().unwrap();
            assert_eq!(found.title, "Bank");
        }

        it "returns None for an unknown id" {
            let db = setup_db();
            assert!(db.get_credential(7).unwrap().is_none());
        }
    }
}
