mod checked;
pub mod clinic;
pub mod costs;
pub mod error;
pub mod pricing;
pub mod productivity;
pub mod strategy;
pub mod tax;

// Flat public surface for the engine.
pub use clinic::{
    default_admin_expenses, default_labor_charges, AdminExpense, ClinicProfile, ClinicRecord,
    CostCategory, CustomCost, Employee, Equipment, FixedCostsLedger, Goals, LaborCharge,
    PartnerDentist, Remuneration, Team,
};
pub use costs::{
    calculate_clinic_costs, cost_rates, employee_total_cost, working_hours_per_month,
    CalculatedCosts, FIXED_COST_ALERT_PERCENT,
};
pub use error::PricingError;
pub use pricing::{gross_up, price_treatment, CostBreakdown, Material, PricingResult, Treatment};
pub use productivity::{occupancy_rate, OccupancyStatus};
pub use strategy::{net_margin, strategy_prices, MarginHealth, NetMargin, StrategyPrices, Tier, TierPrice};
pub use tax::{
    resolve_tax_rate, Bracket, CalculationMethod, ProfitLevies, ServiceClass,
    SoleProprietorLevies, TaxConfig, TaxConfigInput, TaxRatesInput, TaxRegime,
};
