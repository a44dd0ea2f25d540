use surql_translate::query_builder::{Expr, Query};

use crate::models::to_surql;

#[test]
fn test_filter_on_flattened_subquery() {
    let query = Query::from_table("product")
        .filter(|p| {
            Expr::query(
                Query::from_table("order")
                    .select_many(|o| o.member("Products"))
                    .contains(p.member("Id")),
            )
        })
        .select(|p| p.member("Name"));
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE Name FROM product WHERE (SELECT array::flatten(Products) AS Values FROM order GROUP ALL)[0].Values CONTAINS id"
    );
}

#[test]
fn test_parent_query_reference() {
    let query = Query::from_table("order").select_many(|o| {
        Expr::query(
            Query::from_table("address")
                .filter(|a| {
                    a.member("Id")
                        .eq(o.clone().member("Address").member("Id"))
                })
                .select(|a| {
                    Expr::object([
                        ("Id", o.clone().member("Id")),
                        ("City", a.clone().member("City")),
                        ("Country", a.member("Country")),
                    ])
                }),
        )
    });
    assert_eq!(
        to_surql(&query),
        "(SELECT array::flatten((SELECT City, Country, $parent.id AS Id FROM address WHERE id == $parent.Address.id)) AS Values FROM order GROUP ALL)[0].Values"
    );
}

#[test]
fn test_grand_parent_query_reference() {
    let query = Query::from_table("order").select_many(|original| {
        Expr::query(Query::from_table("order").select_many(|order| {
            Expr::query(
                Query::from_table("address")
                    .filter(|a| {
                        a.member("Id")
                            .eq(original.clone().member("Address").member("Id"))
                    })
                    .select(|a| {
                        Expr::object([
                            ("Id", order.clone().member("Id")),
                            ("OriginalId", original.clone().member("Id")),
                            ("City", a.clone().member("City")),
                            ("Country", a.member("Country")),
                        ])
                    }),
            )
        }))
    });
    assert_eq!(
        to_surql(&query),
        "(SELECT array::flatten((SELECT array::flatten((SELECT City, Country, $parent.id AS Id, $parent.$parent.id AS OriginalId FROM address WHERE id == $parent.$parent.Address.id)) AS Values FROM order GROUP ALL)[0].Values) AS Values FROM order GROUP ALL)[0].Values"
    );
}

#[test]
fn test_correlated_count_in_projection() {
    let query = Query::from_table("user").select(|u| {
        Expr::object([
            ("Name", u.clone().member("Username")),
            (
                "Older",
                Expr::query(
                    Query::from_table("user").count_where(|other| {
                        other.member("Age").gt(u.member("Age"))
                    }),
                ),
            ),
        ])
    });
    assert_eq!(
        to_surql(&query),
        "SELECT Username AS Name, (SELECT count(Age > $parent.Age) FROM user GROUP ALL)[0].count AS Older FROM user"
    );
}
