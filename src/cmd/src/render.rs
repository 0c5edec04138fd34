use reporting::dashboard::Snapshot;

/// One-shot textual rendering of the dashboard snapshot. Every section
/// renders an empty state when the filtered set is empty.
pub fn render(snapshot: &Snapshot) {
    let summary = &snapshot.summary;
    println!("==== Sales Dashboard ====");
    println!("Total Sales:        {}", summary.total_sales_display());
    println!("Total Transactions: {}", summary.total_transactions_display());
    println!("Avg Transaction:    {}", summary.avg_transaction_display());
    println!("Unique Customers:   {}", summary.unique_customers_display());

    println!("\n-- Total Sales by Region --");
    for bar in &snapshot.regional_sales {
        println!(
            "{:<8} ${:>14.2}  ({} transactions)",
            bar.region, bar.total_sales, bar.transactions
        );
    }

    println!("\n-- Sales per Customer by Region --");
    for point in &snapshot.regional_metrics {
        println!(
            "{:<8} {:>4} customers  ${:>12.2}/customer",
            point.region, point.unique_customers, point.sales_per_customer
        );
    }

    println!("\n-- Monthly Sales Trend --");
    for point in &snapshot.sales_timeline {
        println!(
            "{} {:<8} ${:>14.2}",
            point.month.format("%Y-%m"),
            point.region,
            point.total_sales
        );
    }

    println!("\n-- Top 10 Products by Revenue --");
    for product in &snapshot.top_products {
        println!("{:<12} ${:>14.2}", product.product, product.total_sales);
    }

    println!("\n-- Product Profitability (top 15 by revenue/unit) --");
    for p in &snapshot.product_profitability {
        println!(
            "{:<12} {:>6} units  ${:>10.2}/unit  avg discount {:>5.2}%",
            p.product, p.total_quantity, p.revenue_per_unit, p.avg_discount
        );
    }

    println!("\n-- Product Sales by Region --");
    let heatmap = &snapshot.product_region_matrix;
    if !heatmap.products.is_empty() {
        print!("{:<12}", "");
        for region in &heatmap.regions {
            print!("{region:>14}");
        }
        println!();
        for (product, row) in heatmap.products.iter().zip(&heatmap.values) {
            print!("{product:<12}");
            for v in row {
                print!("{v:>14.0}");
            }
            println!();
        }
    }

    println!("\n-- Regional Summary --");
    for row in &snapshot.regional_table {
        println!(
            "{:<8} total ${:>14.2}  avg ${:>10.2}  qty {:>6}  tx {:>5}  customers {:>4}  discount {:>5.2}%",
            row.region,
            row.total_sales,
            row.avg_transaction,
            row.total_quantity,
            row.total_transactions,
            row.unique_customers,
            row.avg_discount
        );
    }

    println!("\n-- Product Summary (top 20) --");
    for row in &snapshot.product_table {
        println!(
            "{:<12} total ${:>14.2}  qty {:>6}  avg price ${:>10.2}  discount {:>5.2}%  tx {:>5}",
            row.product,
            row.total_sales,
            row.total_quantity,
            row.avg_unit_price,
            row.avg_discount,
            row.total_transactions
        );
    }
}
