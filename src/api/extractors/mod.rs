pub mod artisan;
