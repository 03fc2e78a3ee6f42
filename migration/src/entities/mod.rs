pub mod airline;
pub mod airport;
pub mod flight_leg;
pub mod route;

pub use airline::Entity as AirlineEntity;
pub use airport::Entity as AirportEntity;
pub use flight_leg::Entity as FlightLegEntity;
pub use route::Entity as RouteEntity;
